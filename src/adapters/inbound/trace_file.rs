use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::common::{TraceError, TraceResult};
use crate::domains::trace::{parse, Trace, TraceSource};

/// Reads the whole trace file into memory, then decodes it.
pub struct TraceFile {
    path: PathBuf,
}

impl TraceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TraceSource for TraceFile {
    async fn load_trace(&self) -> TraceResult<Trace> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| TraceError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse(&bytes)
    }
}
