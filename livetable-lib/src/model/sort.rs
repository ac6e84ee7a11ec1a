//! Column comparators used to order table snapshots.

use std::cmp::Ordering;

use super::RowEvent;
use super::age::parse_age;

/// Orders two rows by the cell at `col`.
///
/// Time columns compare by parsed age and fall back to the row id so equal
/// ages keep a deterministic order. Other columns compare numerically when
/// both cells are numbers and as strings otherwise.
pub(crate) fn compare_rows(a: &RowEvent, b: &RowEvent, col: usize, time: bool) -> Ordering {
    let (x, y) = (a.row.field(col), b.row.field(col));
    if time {
        return parse_age(x)
            .cmp(&parse_age(y))
            .then_with(|| a.row.id.cmp(&b.row.id));
    }

    match (parse_number(x), parse_number(y)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => x.cmp(y),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
