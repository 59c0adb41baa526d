pub mod cup;
pub mod fixtures;

pub use cup::*;
pub use fixtures::*;
