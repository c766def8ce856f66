use crate::common::TransportResult;
use async_trait::async_trait;

/// Broker acknowledgement for one delivered payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishAck {
    pub partition: i32,
    pub offset: i64,
}

/// Port for delivering serialized agent batches to subscribers.
/// Implementations are expected to be already registered with their endpoint.
#[async_trait]
pub trait AgentPublisher: Send + Sync {
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> TransportResult<PublishAck>;
}

/// Handle for leaving the discovery endpoint at shutdown.
#[async_trait]
pub trait NodeRegistration: Send + Sync {
    fn node_name(&self) -> &str;
    async fn deregister(&self) -> TransportResult<()>;
}
