pub mod allocator;
pub mod calendar;
pub mod resolver;
pub mod season;

pub use allocator::*;
pub use calendar::*;
pub use resolver::*;
pub use season::*;
