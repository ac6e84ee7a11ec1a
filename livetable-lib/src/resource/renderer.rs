//! Renderer trait converting raw objects into table rows.

use serde::Deserialize;
use serde::Serialize;

use super::Object;
use crate::error::Error;
use crate::model::Header;
use crate::model::Row;

/// Column preferences configured for a view.
///
/// The engine never interprets these; it only forwards them to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSetting {
    /// Columns to show, possibly including custom column specs.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Default sort column, e.g. `AGE:desc`.
    #[serde(default)]
    pub sort_column: Option<String>,
}

/// Converts raw resource objects into rows.
pub trait Renderer: Send + Sync {
    /// Returns the header for the given namespace scope.
    ///
    /// Renderers typically add a `NAMESPACE` column when listing across all
    /// namespaces.
    fn header(&self, ns: &str) -> Header;

    /// Renders one object into a row matching [`Renderer::header`] for `ns`.
    fn render(&self, object: &Object, ns: &str) -> Result<Row, Error>;

    /// Installs the view setting used for subsequent renders.
    fn set_view_setting(&self, vs: Option<ViewSetting>);
}
