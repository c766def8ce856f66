pub mod model;
pub mod parser;
pub mod ports;

pub use model::*;
pub use parser::*;
pub use ports::*;
