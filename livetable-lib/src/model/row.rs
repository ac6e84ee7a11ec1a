//! Rows and per-field change markers.

use super::Header;
use super::age::parse_age;

/// Display values of a row, one per header column.
pub type Fields = Vec<String>;

/// A rendered resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Stable identity of the underlying resource, e.g. `ns/name`.
    pub id: String,
    /// Display values, one per header column.
    pub fields: Fields,
}

impl Row {
    /// Creates a row.
    pub fn new(id: impl Into<String>, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the field at `index`, or an empty string when out of range.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or_default()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Per-field change markers of an updated row.
///
/// Index `i` holds the previous value of field `i` when it changed and an
/// empty string otherwise. A field whose previous value was itself empty
/// therefore cannot be told apart from an unchanged one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeltaRow(Vec<String>);

impl DeltaRow {
    /// Creates a delta row from raw markers.
    pub fn new(markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(markers.into_iter().map(Into::into).collect())
    }

    /// Compares two renditions of the same resource.
    ///
    /// Returns `None` when every field is equal. Time columns are compared by
    /// their parsed age, other columns by value.
    pub fn diff(old: &Row, new: &Row, header: &Header) -> Option<DeltaRow> {
        let mut changed = false;
        let mut markers = vec![String::new(); new.fields.len()];
        for (i, value) in new.fields.iter().enumerate() {
            let previous = old.field(i);
            if !fields_equal(previous, value, header.is_time_col(i)) {
                changed = true;
                markers[i] = previous.to_string();
            }
        }
        if old.fields.len() != new.fields.len() {
            changed = true;
        }

        changed.then_some(DeltaRow(markers))
    }

    /// Returns the previous value of field `index` if it changed.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .map(String::as_str)
            .filter(|marker| !marker.is_empty())
    }

    /// Returns the raw markers.
    pub fn markers(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if no marker is set.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }

    /// Returns the number of markers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no markers at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn fields_equal(a: &str, b: &str, time: bool) -> bool {
    if a == b {
        return true;
    }
    if time {
        if let (Some(a), Some(b)) = (parse_age(a), parse_age(b)) {
            return a == b;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeaderColumn;

    fn header() -> Header {
        Header::new([
            HeaderColumn::new("NAME"),
            HeaderColumn::new("STATUS"),
            HeaderColumn::new("AGE").time(true),
        ])
    }

    #[test]
    fn test_diff_unchanged() {
        let a = Row::new("a", ["a", "Running", "3m"]);
        assert_eq!(DeltaRow::diff(&a, &a.clone(), &header()), None);
    }

    #[test]
    fn test_diff_records_old_values() {
        let old = Row::new("a", ["a", "Pending", "3m"]);
        let new = Row::new("a", ["a", "Running", "4m"]);
        let delta = DeltaRow::diff(&old, &new, &header()).unwrap();
        assert_eq!(delta.markers(), &["", "Pending", "3m"]);
        assert_eq!(delta.get(0), None);
        assert_eq!(delta.get(1), Some("Pending"));
    }

    #[test]
    fn test_diff_time_column_by_duration() {
        let old = Row::new("a", ["a", "Running", "120s"]);
        let new = Row::new("a", ["a", "Running", "2m"]);
        assert_eq!(DeltaRow::diff(&old, &new, &header()), None);
    }

    #[test]
    fn test_diff_from_empty_value() {
        let old = Row::new("a", ["a", "", "3m"]);
        let new = Row::new("a", ["a", "Running", "3m"]);
        let delta = DeltaRow::diff(&old, &new, &header()).unwrap();
        assert!(delta.is_blank());
    }
}
