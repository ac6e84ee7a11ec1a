//! Listener capability implemented by the presentation layer.

use crate::error::Error;
use crate::model::TableData;

/// Receives table model notifications.
///
/// Callbacks run synchronously on the model's scheduler task after every
/// reconciliation and must return promptly, or they delay the next tick.
/// Snapshots are copies; keep them by cloning.
pub trait TableListener: Send + Sync {
    /// A reconciliation produced no rows.
    fn table_no_data(&self, data: &TableData);

    /// A reconciliation produced rows.
    fn table_data_changed(&self, data: &TableData);

    /// The scheduler gave up after spending its retry window. No further
    /// notifications follow until the model is watched again.
    fn table_load_failed(&self, err: &Error);
}
