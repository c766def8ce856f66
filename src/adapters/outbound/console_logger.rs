use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Forwards domain log lines to the `tracing` subscriber installed by the binary.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn debug(&self, msg: &str) {
        tracing::debug!(target: "fcd_stream", "{}", msg);
    }

    fn info(&self, msg: &str) {
        tracing::info!(target: "fcd_stream", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "fcd_stream", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "fcd_stream", "{}", msg);
    }
}

struct Silent;

impl DomainLogger for Silent {
    fn debug(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

pub fn init_tracing_logger() -> Arc<dyn DomainLogger> {
    Arc::new(TracingBridge {})
}

/// Discards everything; handy as a default in unit tests
pub fn init_silent_logger() -> Arc<dyn DomainLogger> {
    Arc::new(Silent {})
}
