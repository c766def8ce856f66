use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::types::RDKafkaErrorCode;

use crate::common::{TransportError, TransportResult};
use crate::config::DiscoveryConfig;
use crate::domains::agents::{AgentPublisher, NodeRegistration, PublishAck};

/// Kafka-backed agent publisher.
///
/// The discovery endpoint is used as the bootstrap address. Registering
/// fetches cluster metadata once so an unreachable endpoint fails at
/// startup instead of on the first publish.
pub struct KafkaAgentPublisher {
    producer: FutureProducer,
    node_name: String,
    brokers: Vec<String>,
    delivery_timeout: Duration,
}

impl KafkaAgentPublisher {
    pub async fn register(config: &DiscoveryConfig) -> TransportResult<Self> {
        let registration_error = |reason: String| TransportError::Registration {
            endpoint: config.endpoint.clone(),
            reason,
        };

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.endpoint)
            .set("client.id", &config.node_name)
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .create()
            .map_err(|e| registration_error(format!("Failed to create Kafka producer: {}", e)))?;

        let probe = producer.clone();
        let timeout = Duration::from_millis(config.registration_timeout_ms);
        let brokers = tokio::task::spawn_blocking(move || {
            let metadata = probe.client().fetch_metadata(None, timeout)?;
            Ok::<_, KafkaError>(
                metadata
                    .brokers()
                    .iter()
                    .map(|b| format!("{}:{}", b.host(), b.port()))
                    .collect::<Vec<_>>(),
            )
        })
        .await
        .map_err(|e| registration_error(format!("Metadata probe aborted: {}", e)))?
        .map_err(|e| registration_error(e.to_string()))?;

        tracing::debug!("Metadata probe returned brokers {:?}", brokers);

        Ok(Self {
            producer,
            node_name: config.node_name.clone(),
            brokers,
            delivery_timeout: Duration::from_millis(config.message_timeout_ms),
        })
    }

    pub fn brokers(&self) -> &[String] {
        &self.brokers
    }
}

#[async_trait]
impl AgentPublisher for KafkaAgentPublisher {
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> TransportResult<PublishAck> {
        let record = FutureRecord::to(channel)
            .key(self.node_name.as_str())
            .payload(payload.as_slice());

        match self.producer.send(record, self.delivery_timeout).await {
            Ok((partition, offset)) => Ok(PublishAck { partition, offset }),
            Err((e, _)) => Err(send_error(e)),
        }
    }
}

#[async_trait]
impl NodeRegistration for KafkaAgentPublisher {
    fn node_name(&self) -> &str {
        &self.node_name
    }

    /// Flushing blocks for up to the delivery timeout, so it runs off the runtime threads.
    async fn deregister(&self) -> TransportResult<()> {
        let producer = self.producer.clone();
        let timeout = self.delivery_timeout;
        tokio::task::spawn_blocking(move || producer.flush(timeout))
            .await
            .map_err(|e| TransportError::Delivery(format!("Flush aborted: {}", e)))?
            .map_err(|e| TransportError::Delivery(format!("Failed to flush producer: {}", e)))
    }
}

/// Lost broker connectivity is reported separately from other delivery errors.
fn send_error(e: KafkaError) -> TransportError {
    match e {
        KafkaError::MessageProduction(
            code @ (RDKafkaErrorCode::AllBrokersDown | RDKafkaErrorCode::BrokerTransportFailure),
        ) => TransportError::NotConnected(code.to_string()),
        other => TransportError::Delivery(format!("Failed to send batch to Kafka: {}", other)),
    }
}
