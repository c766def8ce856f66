pub mod console_logger;
pub mod dry_run;
pub mod kafka;

pub use console_logger::*;
pub use dry_run::*;
pub use kafka::*;
