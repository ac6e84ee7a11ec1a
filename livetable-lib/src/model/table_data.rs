//! Tabular storage and the render/diff engine.

use chrono::DateTime;
use chrono::Utc;
use log::warn;

use super::DeltaRow;
use super::FilterQuery;
use super::Header;
use super::Row;
use super::RowEvent;
use super::RowEvents;
use super::sort::compare_rows;
use crate::error::Error;
use crate::resource::Object;
use crate::resource::Renderer;
use crate::resource::ResourceKind;

/// The rows of one resource kind in one namespace scope.
///
/// A `TableData` owned by a table model is replaced wholesale on every
/// successful reconciliation. Everything handed out to other threads is a
/// [`Clone`], which is a deep copy the receiver owns outright.
#[derive(Debug, Clone)]
pub struct TableData {
    gvr: ResourceKind,
    header: Header,
    namespace: String,
    row_events: RowEvents,
    last_updated: Option<DateTime<Utc>>,
}

impl TableData {
    /// Creates an empty table for a resource kind.
    pub fn new(gvr: ResourceKind) -> Self {
        Self {
            gvr,
            header: Header::default(),
            namespace: String::new(),
            row_events: RowEvents::new(),
            last_updated: None,
        }
    }

    /// Creates a table holding the given rows.
    pub fn with_rows(gvr: ResourceKind, header: Header, row_events: RowEvents) -> Self {
        Self {
            gvr,
            header,
            namespace: String::new(),
            row_events,
            last_updated: None,
        }
    }

    /// Returns the resource kind.
    pub fn gvr(&self) -> &ResourceKind {
        &self.gvr
    }

    /// Returns the header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Replaces the header.
    pub fn set_header(&mut self, header: Header) {
        self.header = header;
    }

    /// Returns the namespace scope.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the rows in display order.
    pub fn row_events(&self) -> &RowEvents {
        &self.row_events
    }

    /// Returns the row with the given id.
    pub fn find_row(&self, id: &str) -> Option<&RowEvent> {
        self.row_events.get(id)
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_events.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_events.is_empty()
    }

    /// Returns when rows were last rendered.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Drops every row and switches to namespace `ns`.
    pub fn reset(&mut self, ns: impl Into<String>) {
        self.namespace = ns.into();
        self.row_events.clear();
    }

    /// Renders `objects` and replaces the rows, diffing against the previous
    /// render.
    pub fn render(&mut self, renderer: &dyn Renderer, objects: &[Object]) -> Result<(), Error> {
        let (header, rows) = render_rows(renderer, &self.namespace, objects)?;
        self.update(header, rows);
        Ok(())
    }

    /// Replaces the rows with a fresh render.
    ///
    /// Rows keep their kind relative to the previous render: new ids are
    /// `Add`, identical rows `Unchanged`, others `Update` with the old values
    /// recorded as deltas. Ids missing from `rows` are dropped. A header
    /// change invalidates the previous rows, so every row becomes an `Add`.
    pub fn update(&mut self, header: Header, rows: Vec<Row>) {
        if header != self.header {
            self.row_events.clear();
            self.header = header;
        }

        let mut events = RowEvents::with_capacity(rows.len());
        for row in rows {
            let event = match self.row_events.get(&row.id) {
                None => RowEvent::added(row),
                Some(prev) => match DeltaRow::diff(&prev.row, &row, &self.header) {
                    None => RowEvent::unchanged(row),
                    Some(deltas) => RowEvent::updated(row, deltas),
                },
            };
            let id = event.row.id.clone();
            if !events.push(event) {
                warn!("Duplicate row {id:?} in {} render, keeping first", self.gvr);
            }
        }
        self.row_events = events;
        self.last_updated = Some(Utc::now());
    }

    /// Stable-sorts the rows by the named column.
    ///
    /// Sorting an empty table is a no-op, whatever the column.
    pub fn sort_column(&mut self, name: &str, ascending: bool) -> Result<(), Error> {
        if self.row_events.is_empty() {
            return Ok(());
        }
        let col = self
            .header
            .index_of(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        let time = self.header.is_time_col(col);
        if ascending {
            self.row_events.sort_by(|a, b| compare_rows(a, b, col, time));
        } else {
            self.row_events.sort_by(|a, b| compare_rows(b, a, col, time));
        }
        Ok(())
    }

    /// Reverses the current row order in place.
    pub fn invert(&mut self) {
        self.row_events.reverse();
    }

    /// Returns a snapshot holding only the rows matching `query`.
    ///
    /// See [`FilterQuery`] for the query syntax. `self` is left untouched.
    pub fn filter(&self, query: &str) -> TableData {
        let row_events = FilterQuery::parse(query).apply(&self.header, &self.row_events);
        TableData {
            gvr: self.gvr.clone(),
            header: self.header.clone(),
            namespace: self.namespace.clone(),
            row_events,
            last_updated: self.last_updated,
        }
    }
}

/// Renders objects into rows for namespace `ns`.
///
/// Fails if the renderer fails or produces a row whose field count does not
/// match its header.
pub(crate) fn render_rows(
    renderer: &dyn Renderer,
    ns: &str,
    objects: &[Object],
) -> Result<(Header, Vec<Row>), Error> {
    let header = renderer.header(ns);
    let mut rows = Vec::with_capacity(objects.len());
    for object in objects {
        let row = renderer.render(object, ns)?;
        if row.fields.len() != header.len() {
            return Err(Error::render(
                row.id,
                format!("expected {} fields but got {}", header.len(), row.fields.len()),
            ));
        }
        rows.push(row);
    }

    Ok((header, rows))
}
