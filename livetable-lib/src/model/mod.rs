//! Tabular data model: headers, rows, row events and table snapshots.
//!
//! [`TableData`] is what a table model hands to its listeners. Sorting and
//! filtering operate on those snapshots and never touch the model's own copy.

mod age;
mod filter;
mod header;
mod row;
mod row_event;
mod sort;
mod table_data;

pub use age::*;
pub use filter::FilterQuery;
pub use header::*;
pub use row::*;
pub use row_event::*;
pub use table_data::TableData;

pub(crate) use table_data::render_rows;
