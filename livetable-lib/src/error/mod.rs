//! Error types

mod fetch;
mod table;

pub use fetch::*;
pub use table::*;
