pub mod trace_file;

pub use trace_file::*;
