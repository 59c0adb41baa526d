pub mod fixtures;
pub mod league;

pub use fixtures::*;
pub use league::*;
