//! Error types

mod column;
mod grid;
mod source;
mod store;

pub use column::*;
pub use grid::*;
pub use source::*;
pub use store::*;
