pub mod shutdown;
pub mod trace_stream_service;

pub use shutdown::*;
pub use trace_stream_service::*;
