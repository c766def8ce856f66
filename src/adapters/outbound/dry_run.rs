use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use crate::common::TransportResult;
use crate::domains::agents::{AgentPublisher, NodeRegistration, PAgents, PublishAck};
use crate::domains::logger::DynLogger;

/// Publisher that never leaves the process. Each payload is decoded back and
/// summarised in the log, and acknowledged with a monotonically increasing offset.
pub struct DryRunPublisher {
    node_name: String,
    logger: DynLogger,
    next_offset: AtomicI64,
}

impl DryRunPublisher {
    pub fn new(node_name: impl Into<String>, logger: DynLogger) -> Self {
        Self {
            node_name: node_name.into(),
            logger,
            next_offset: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl AgentPublisher for DryRunPublisher {
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> TransportResult<PublishAck> {
        let offset = self.next_offset.fetch_add(1, Ordering::SeqCst);
        let agents = <PAgents as prost::Message>::decode(payload.as_slice())
            .map(|p| p.agents.len())
            .unwrap_or_default();
        self.logger.info(&format!(
            "[dry-run] {} -> {}: {} bytes, {} agents (offset {})",
            self.node_name,
            channel,
            payload.len(),
            agents,
            offset
        ));
        Ok(PublishAck {
            partition: 0,
            offset,
        })
    }
}

#[async_trait]
impl NodeRegistration for DryRunPublisher {
    fn node_name(&self) -> &str {
        &self.node_name
    }

    async fn deregister(&self) -> TransportResult<()> {
        Ok(())
    }
}
