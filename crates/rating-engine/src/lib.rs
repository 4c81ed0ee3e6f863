pub mod highlights;
pub mod scorer;

pub use highlights::*;
pub use scorer::*;
