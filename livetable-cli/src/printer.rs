//! Listener printing table snapshots to stdout.

use livetable_lib::Context;
use livetable_lib::TableListener;
use livetable_lib::error::Error;
use livetable_lib::model::Align;
use livetable_lib::model::EventKind;
use livetable_lib::model::TableData;
use log::warn;

/// Prints every snapshot sorted by `sort_column`, keeping rows that match
/// `filter`.
pub struct Printer {
    sort_column: String,
    ascending: bool,
    filter: String,
    ctx: Context,
}

impl Printer {
    /// Creates a printer that cancels `ctx` once the table gives up loading.
    pub fn new(
        sort_column: impl Into<String>,
        ascending: bool,
        filter: impl Into<String>,
        ctx: Context,
    ) -> Self {
        Self {
            sort_column: sort_column.into(),
            ascending,
            filter: filter.into(),
            ctx,
        }
    }

    fn print(&self, data: &TableData) {
        let mut view = data.filter(&self.filter);
        if let Err(err) = view.sort_column(&self.sort_column, self.ascending) {
            warn!("Cannot sort {}: {err}", view.gvr());
        }
        println!("{}", render(&view));
    }
}

impl TableListener for Printer {
    fn table_no_data(&self, data: &TableData) {
        println!("No {} in {:?}\n", data.gvr(), data.namespace());
    }

    fn table_data_changed(&self, data: &TableData) {
        self.print(data);
    }

    fn table_load_failed(&self, err: &Error) {
        eprintln!("Error: {err}");
        self.ctx.cancel();
    }
}

/// Lays out a snapshot as padded text columns, with changed fields marked
/// by `*` and added rows by `+`.
pub fn render(data: &TableData) -> String {
    let header = data.header();
    let cells: Vec<Vec<String>> = data
        .row_events()
        .iter()
        .map(|e| {
            header
                .columns()
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let mut cell = col.decorate(e.row.field(i));
                    if e.deltas.get(i).is_some() {
                        cell.push('*');
                    }
                    cell
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.columns().iter().map(|c| c.name.len()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str("  ");
    out.push_str(&line(header.columns().iter().map(|c| (c.name.as_str(), c.align)), &widths));
    for (e, row) in data.row_events().iter().zip(&cells) {
        out.push('\n');
        out.push_str(match e.kind {
            EventKind::Add => "+ ",
            _ => "  ",
        });
        let aligned = row.iter().zip(header.columns()).map(|(cell, c)| (cell.as_str(), c.align));
        out.push_str(&line(aligned, &widths));
    }
    out.push('\n');
    out
}

fn line<'a>(cells: impl Iterator<Item = (&'a str, Align)>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|((cell, align), w)| match align {
            Align::Left => format!("{cell:<w$}"),
            Align::Right => format!("{cell:>w$}"),
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use livetable_lib::model::Header;
    use livetable_lib::model::HeaderColumn;
    use livetable_lib::model::Row;
    use livetable_lib::resource::ResourceKind;

    fn data() -> TableData {
        let mut data = TableData::new(ResourceKind::new("local/v1/files"));
        let header = Header::new([
            HeaderColumn::new("NAME"),
            HeaderColumn::new("SIZE").align(Align::Right),
        ]);
        data.update(
            header.clone(),
            vec![Row::new("a", ["a", "1"]), Row::new("bb", ["bb", "100"])],
        );
        data.update(
            header,
            vec![Row::new("a", ["a", "2"]), Row::new("bb", ["bb", "100"])],
        );
        data
    }

    #[test]
    fn test_render_aligns_and_marks() {
        let out = render(&data());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "  NAME  SIZE");
        assert_eq!(lines[1], "  a       2*");
        assert_eq!(lines[2], "  bb     100");
    }

    #[test]
    fn test_render_marks_added_rows() {
        let mut data = TableData::new(ResourceKind::new("local/v1/files"));
        data.update(Header::new([HeaderColumn::new("NAME")]), vec![Row::new("a", ["a"])]);
        assert!(render(&data).lines().nth(1).unwrap().starts_with("+ a"));
    }
}
