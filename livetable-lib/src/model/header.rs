//! Table header and column descriptors.

/// Per-column display transform, e.g. turning timestamps into ages.
pub type Decorator = fn(&str) -> String;

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left aligned (default).
    #[default]
    Left,
    /// Right aligned, typically numbers.
    Right,
}

/// Describes one column of a table.
///
/// # Example
///
/// ```
/// use livetable_lib::model::{age_decorator, Align, HeaderColumn};
///
/// let age = HeaderColumn::new("AGE").time(true).decorator(age_decorator);
/// let restarts = HeaderColumn::new("RESTARTS").align(Align::Right);
/// assert!(age.is_time());
/// assert_eq!(restarts.align, Align::Right);
/// ```
#[derive(Debug, Clone)]
pub struct HeaderColumn {
    /// Column name, unique within a header.
    pub name: String,
    /// Horizontal alignment.
    pub align: Align,
    /// The column holds elapsed ages.
    pub time: bool,
    /// Display transform applied by the presentation layer.
    pub decorator: Option<Decorator>,
}

impl HeaderColumn {
    /// Creates a left aligned, plain column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            align: Align::Left,
            time: false,
            decorator: None,
        }
    }

    /// Sets the alignment.
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Flags the column as holding elapsed ages.
    pub fn time(mut self, time: bool) -> Self {
        self.time = time;
        self
    }

    /// Sets the display decorator.
    pub fn decorator(mut self, decorator: Decorator) -> Self {
        self.decorator = Some(decorator);
        self
    }

    /// Returns `true` if the column holds elapsed ages.
    pub fn is_time(&self) -> bool {
        self.time
    }

    /// Applies the decorator, if any, to a cell value.
    pub fn decorate(&self, value: &str) -> String {
        match self.decorator {
            Some(decorator) => decorator(value),
            None => value.to_string(),
        }
    }
}

// Decorators are display-only and take no part in equality.
impl PartialEq for HeaderColumn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.align == other.align
            && self.time == other.time
    }
}

impl Eq for HeaderColumn {}

/// Ordered column descriptors defining a table's shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header(Vec<HeaderColumn>);

impl Header {
    /// Creates a header from its columns.
    pub fn new(columns: impl IntoIterator<Item = HeaderColumn>) -> Self {
        Self(columns.into_iter().collect())
    }

    /// Returns the columns.
    pub fn columns(&self) -> &[HeaderColumn] {
        &self.0
    }

    /// Returns the column at `index`.
    pub fn get(&self, index: usize) -> Option<&HeaderColumn> {
        self.0.get(index)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the column names in order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns the index of the named column.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c.name == name)
    }

    /// Returns `true` if the column at `index` holds elapsed ages.
    pub fn is_time_col(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(HeaderColumn::is_time)
    }

    /// Returns `true` if any column holds elapsed ages.
    pub fn has_age(&self) -> bool {
        self.0.iter().any(HeaderColumn::is_time)
    }
}

impl FromIterator<HeaderColumn> for Header {
    fn from_iter<I: IntoIterator<Item = HeaderColumn>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::age_decorator;

    fn header() -> Header {
        Header::new([
            HeaderColumn::new("NAMESPACE"),
            HeaderColumn::new("NAME").align(Align::Right),
            HeaderColumn::new("AGE").time(true).decorator(age_decorator),
        ])
    }

    #[test]
    fn test_lookup() {
        let h = header();
        assert_eq!(h.len(), 3);
        assert_eq!(h.index_of("NAME"), Some(1));
        assert_eq!(h.index_of("FRED"), None);
        assert_eq!(h.names(), vec!["NAMESPACE", "NAME", "AGE"]);
    }

    #[test]
    fn test_time_columns() {
        let h = header();
        assert!(h.has_age());
        assert!(h.is_time_col(2));
        assert!(!h.is_time_col(0));
        assert!(!h.is_time_col(10));
    }

    #[test]
    fn test_equality_ignores_decorator() {
        let plain = Header::new([
            HeaderColumn::new("NAMESPACE"),
            HeaderColumn::new("NAME").align(Align::Right),
            HeaderColumn::new("AGE").time(true),
        ]);
        assert_eq!(plain, header());
        assert_ne!(plain, Header::new([HeaderColumn::new("NAME")]));
    }
}
