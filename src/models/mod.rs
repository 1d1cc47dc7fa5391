pub mod page;
pub mod summary;
pub mod turn;

pub use page::*;
pub use summary::*;
pub use turn::*;
