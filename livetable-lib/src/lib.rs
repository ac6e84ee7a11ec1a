//! Live table engine
//!
//! Polls remote resources, renders them into rows, diffs each render against
//! the previous one and hands consistent snapshots to presentation listeners.
//! Snapshots can be sorted and filtered for display without touching the
//! live table.

pub mod error;
pub mod model;
pub mod namespace;
pub mod refresh;
pub mod resource;

mod context;
mod labels;
mod listener;
mod table;
mod tabular;

pub use context::Context;
pub use labels::LabelSelector;
pub use labels::Requirement;
pub use listener::TableListener;
pub use table::TableModel;
pub use tabular::Tabular;
