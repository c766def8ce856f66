pub mod batch;
pub mod identity;
pub mod ports;
pub mod proto;

pub use batch::*;
pub use identity::{classify, resolve, LabelClass};
pub use ports::*;
pub use proto::{PAgent, PAgents};
