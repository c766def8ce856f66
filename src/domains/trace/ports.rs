use super::model::Trace;
use crate::common::TraceResult;
use async_trait::async_trait;

/// Port the stream pipeline uses to obtain a complete trace before it starts publishing.
#[async_trait]
pub trait TraceSource: Send + Sync {
    async fn load_trace(&self) -> TraceResult<Trace>;
}
