pub mod agents;
pub mod logger;
pub mod trace;

pub use logger::*;
