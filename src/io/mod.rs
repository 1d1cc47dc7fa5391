pub mod input;
pub mod locator;
pub mod output;

pub use input::*;
pub use locator::*;
pub use output::*;
