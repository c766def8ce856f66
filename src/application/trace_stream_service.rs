// Trace Stream Service - replays a loaded trace as cumulative agent batches
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::common::TransportError;
use crate::config::Config;
use crate::domains::agents::{
    classify, AgentPublisher, EntityCoverage, LabelClass, OutboundBatch, PublishAck,
};
use crate::domains::logger::DynLogger;
use crate::domains::trace::{EntityRecord, Timestep, Trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSettings {
    pub channel: String,
    pub interval: Duration,
    pub coverage: EntityCoverage,
}

impl StreamSettings {
    pub fn new(channel: impl Into<String>, interval: Duration) -> Self {
        Self {
            channel: channel.into(),
            interval,
            coverage: EntityCoverage::VehiclesOnly,
        }
    }

    pub fn with_coverage(mut self, coverage: EntityCoverage) -> Self {
        self.coverage = coverage;
        self
    }
}

impl From<&Config> for StreamSettings {
    fn from(config: &Config) -> Self {
        Self {
            channel: config.stream.channel.clone(),
            interval: config.interval(),
            coverage: EntityCoverage::from_include_persons(config.stream.include_persons),
        }
    }
}

/// Result of one publish attempt. Failures are recorded, never propagated.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Published(PublishAck),
    Failed(TransportError),
}

impl StepOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, StepOutcome::Published(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub time: f64,
    pub added: usize,
    pub cumulative: usize,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    pub interrupted: bool,
}

impl RunReport {
    pub fn published(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_published()).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.len() - self.published()
    }

    pub fn last_batch_size(&self) -> usize {
        self.steps.last().map(|s| s.cumulative).unwrap_or(0)
    }
}

pub struct TraceStreamService {
    publisher: Arc<dyn AgentPublisher>,
    logger: DynLogger,
    settings: StreamSettings,
}

impl TraceStreamService {
    pub fn new(publisher: Arc<dyn AgentPublisher>, logger: DynLogger, settings: StreamSettings) -> Self {
        Self {
            publisher,
            logger,
            settings,
        }
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    /// Publish the cumulative batch once per timestep, in trace order, pausing
    /// `interval` after every attempt. Stops early once `shutdown` turns true.
    pub async fn run(&self, trace: &Trace, mut shutdown: watch::Receiver<bool>) -> RunReport {
        self.logger.info(&format!("Len {}", trace.len()));

        let mut report = RunReport::default();
        let mut batch = OutboundBatch::new();

        for (index, timestep) in trace.timesteps().iter().enumerate() {
            if *shutdown.borrow() {
                report.interrupted = true;
                break;
            }

            self.note_unclassified(timestep);
            let added = batch.extend_from_timestep(timestep, self.settings.coverage);
            self.logger.info(&format!("Agents: {} {}", batch.len(), added));

            let outcome = self.publish_step(&batch).await;
            report.steps.push(StepReport {
                index,
                time: timestep.time,
                added,
                cumulative: batch.len(),
                outcome,
            });

            tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => {}
                _ = wait_for_shutdown(&mut shutdown) => {
                    report.interrupted = true;
                    break;
                }
            }
        }

        report
    }

    async fn publish_step(&self, batch: &OutboundBatch) -> StepOutcome {
        let payload = batch.encode();
        match self.publisher.publish(&self.settings.channel, payload).await {
            Ok(ack) => StepOutcome::Published(ack),
            Err(e) => {
                self.logger.warn(&format!(
                    "Connection failure on step {}: {}",
                    batch.sequence, e
                ));
                StepOutcome::Failed(e)
            }
        }
    }

    fn note_unclassified(&self, timestep: &Timestep) {
        let persons: &[EntityRecord] = match self.settings.coverage {
            EntityCoverage::VehiclesOnly => &[],
            EntityCoverage::VehiclesAndPersons => &timestep.persons,
        };
        for record in timestep.vehicles.iter().chain(persons) {
            if classify(&record.label) == LabelClass::Unclassified {
                self.logger.debug(&format!(
                    "Label '{}' matches no id rule, publishing as id 0",
                    record.label
                ));
            }
        }
    }
}

/// Resolves once the flag is true. A dropped sender never resolves.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
