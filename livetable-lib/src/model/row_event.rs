//! Row events and the keyed, ordered collection holding them.

use std::collections::HashMap;

use super::DeltaRow;
use super::Row;

/// How a row changed since the previous render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventKind {
    /// The row did not exist before.
    #[default]
    Add,
    /// At least one field changed.
    Update,
    /// Every field is identical.
    Unchanged,
}

/// A row together with its change state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowEvent {
    /// The rendered row.
    pub row: Row,
    /// Previous values of changed fields, empty unless `kind` is `Update`.
    pub deltas: DeltaRow,
    /// Change kind.
    pub kind: EventKind,
}

impl RowEvent {
    /// Creates an event for a new row.
    pub fn added(row: Row) -> Self {
        Self {
            row,
            deltas: DeltaRow::default(),
            kind: EventKind::Add,
        }
    }

    /// Creates an event for a row whose fields did not change.
    pub fn unchanged(row: Row) -> Self {
        Self {
            row,
            deltas: DeltaRow::default(),
            kind: EventKind::Unchanged,
        }
    }

    /// Creates an event for a changed row.
    pub fn updated(row: Row, deltas: DeltaRow) -> Self {
        Self {
            row,
            deltas,
            kind: EventKind::Update,
        }
    }

    /// Returns the row identity.
    pub fn id(&self) -> &str {
        &self.row.id
    }
}

/// Row events kept in display order and indexed by row id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowEvents {
    events: Vec<RowEvent>,
    index: HashMap<String, usize>,
}

impl RowEvents {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if there are no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` if a row with `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the event for `id`.
    pub fn get(&self, id: &str) -> Option<&RowEvent> {
        self.index.get(id).map(|&i| &self.events[i])
    }

    /// Returns the event at display position `index`.
    pub fn at(&self, index: usize) -> Option<&RowEvent> {
        self.events.get(index)
    }

    /// Iterates events in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, RowEvent> {
        self.events.iter()
    }

    /// Returns the events in display order.
    pub fn as_slice(&self) -> &[RowEvent] {
        &self.events
    }

    /// Returns the row ids in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.events.iter().map(RowEvent::id).collect()
    }

    /// Appends an event. Returns `false` and keeps the existing event when a
    /// row with the same id is already present.
    pub fn push(&mut self, event: RowEvent) -> bool {
        if self.index.contains_key(event.id()) {
            return false;
        }
        self.index.insert(event.id().to_string(), self.events.len());
        self.events.push(event);
        true
    }

    /// Removes every event.
    pub fn clear(&mut self) {
        self.events.clear();
        self.index.clear();
    }

    /// Reorders events with a stable sort.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&RowEvent, &RowEvent) -> std::cmp::Ordering,
    {
        self.events.sort_by(compare);
        self.reindex();
    }

    /// Reverses the display order.
    pub fn reverse(&mut self) {
        self.events.reverse();
        self.reindex();
    }

    /// Returns a new collection holding the events matching `keep`, in order.
    pub fn filtered<F>(&self, mut keep: F) -> RowEvents
    where
        F: FnMut(&RowEvent) -> bool,
    {
        let mut out = RowEvents::new();
        for event in &self.events {
            if keep(event) {
                out.push(event.clone());
            }
        }
        out
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, event) in self.events.iter().enumerate() {
            self.index.insert(event.row.id.clone(), i);
        }
    }
}

impl FromIterator<RowEvent> for RowEvents {
    fn from_iter<I: IntoIterator<Item = RowEvent>>(iter: I) -> Self {
        let mut events = RowEvents::new();
        for event in iter {
            events.push(event);
        }
        events
    }
}

impl<'a> IntoIterator for &'a RowEvents {
    type Item = &'a RowEvent;
    type IntoIter = std::slice::Iter<'a, RowEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> RowEvent {
        RowEvent::added(Row::new(id, [id]))
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut events = RowEvents::new();
        assert!(events.push(event("a")));
        assert!(!events.push(RowEvent::unchanged(Row::new("a", ["other"]))));
        assert_eq!(events.len(), 1);
        assert_eq!(events.get("a").unwrap().kind, EventKind::Add);
    }

    #[test]
    fn test_reverse_keeps_index() {
        let mut events: RowEvents = ["a", "b", "c"].into_iter().map(event).collect();
        events.reverse();
        assert_eq!(events.ids(), vec!["c", "b", "a"]);
        assert_eq!(events.get("c").unwrap().row.fields, vec!["c"]);
        assert_eq!(events.at(0).unwrap().id(), "c");
    }

    #[test]
    fn test_filtered_leaves_source_alone() {
        let events: RowEvents = ["a", "b", "c"].into_iter().map(event).collect();
        let only_b = events.filtered(|e| e.id() == "b");
        assert_eq!(only_b.ids(), vec!["b"]);
        assert!(only_b.contains("b"));
        assert_eq!(events.len(), 3);
    }
}
