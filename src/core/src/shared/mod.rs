pub mod fixture;
pub mod standing;

pub use fixture::*;
pub use standing::*;
