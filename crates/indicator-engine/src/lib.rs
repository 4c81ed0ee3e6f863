pub mod engine;
pub mod indicators;
pub mod interpreter;


pub use engine::*;
pub use interpreter::*;
