pub mod continental;
pub mod knockout;
pub mod league_phase;

pub use continental::*;
pub use knockout::*;
pub use league_phase::*;
