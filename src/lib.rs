pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;

pub use config::Config;

// Re-export common types
pub use common::*;

// Re-export the pipeline surface
pub use application::{RunReport, StepOutcome, StreamSettings, TraceStreamService};
pub use domains::agents::{accumulate, resolve, EntityCoverage, OutboundBatch};
pub use domains::trace::{parse, Trace};
