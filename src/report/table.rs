//! Generic table model and a plain-text renderer.
//!
//! A table is described by columns, each pairing a header with an
//! extractor that turns a row into a [`Cell`]. Rendering is separate and
//! goes through the [`TableRenderer`] trait so callers can plug their own
//! sink or format.

use crate::utils::config::DurationUnit;
use crate::utils::error::ReportError;
use std::io::Write;

/// One rendered value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// No value for this row (renders blank)
    Empty,
    Text(String),
    Count(u64),
    /// Signed nanoseconds
    Nanos(i64),
    Flag(bool),
}

impl Cell {
    /// Text form of the cell using `unit` for durations
    pub fn format(&self, unit: DurationUnit) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Count(count) => count.to_string(),
            Cell::Nanos(nanos) => format_nanos(*nanos, unit),
            Cell::Flag(flag) => flag.to_string(),
        }
    }

    fn is_left_aligned(&self) -> bool {
        matches!(self, Cell::Text(_) | Cell::Empty)
    }
}

/// Header plus value extractor
pub struct Column<R> {
    pub name: &'static str,
    pub value: fn(&R) -> Result<Cell, ReportError>,
}

impl<R> Column<R> {
    pub fn new(name: &'static str, value: fn(&R) -> Result<Cell, ReportError>) -> Self {
        Self { name, value }
    }
}

/// Fully extracted table ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Extract every column of every row
    ///
    /// Fails with the first extractor error (e.g. a required tagged value
    /// that is missing).
    pub fn build<R>(
        title: impl Into<String>,
        columns: &[Column<R>],
        rows: &[R],
    ) -> Result<Table, ReportError> {
        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| (column.value)(row))
                    .collect::<Result<Vec<Cell>, ReportError>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Table {
            title: title.into(),
            headers: columns.iter().map(|c| c.name.to_string()).collect(),
            rows: cells,
        })
    }

    /// Position of a header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Sink for finished tables
pub trait TableRenderer {
    fn render(&mut self, table: &Table) -> Result<(), ReportError>;
}

/// Box-drawn text tables written to any `io::Write`
pub struct TextRenderer<W: Write> {
    out: W,
    unit: DurationUnit,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, unit: DurationUnit) -> Self {
        Self { out, unit }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TableRenderer for TextRenderer<W> {
    fn render(&mut self, table: &Table) -> Result<(), ReportError> {
        let formatted: Vec<Vec<(String, bool)>> = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (cell.format(self.unit), cell.is_left_aligned()))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
        for row in &formatted {
            for (i, (text, _)) in row.iter().enumerate() {
                widths[i] = widths[i].max(text.chars().count());
            }
        }

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "━".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };

        writeln!(self.out, "  {}", table.title)?;
        writeln!(self.out, "  {}", rule("┏", "┳", "┓"))?;
        let header: Vec<String> = table
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!(" {:^w$} ", h, w = *w))
            .collect();
        writeln!(self.out, "  ┃{}┃", header.join("┃"))?;
        writeln!(self.out, "  {}", rule("┣", "╋", "┫"))?;

        for row in &formatted {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|((text, left), w)| {
                    if *left {
                        format!(" {:<w$} ", text, w = *w)
                    } else {
                        format!(" {:>w$} ", text, w = *w)
                    }
                })
                .collect();
            writeln!(self.out, "  ┃{}┃", cells.join("┃"))?;
        }

        writeln!(self.out, "  {}", rule("┗", "┻", "┛"))?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// Render signed nanoseconds in the requested unit
pub fn format_nanos(nanos: i64, unit: DurationUnit) -> String {
    let unit = match unit {
        DurationUnit::Auto => {
            let magnitude = nanos.unsigned_abs();
            if magnitude < 1_000 {
                DurationUnit::Ns
            } else if magnitude < 1_000_000 {
                DurationUnit::Us
            } else if magnitude < 1_000_000_000 {
                DurationUnit::Ms
            } else {
                DurationUnit::S
            }
        }
        other => other,
    };

    match unit {
        DurationUnit::Ns | DurationUnit::Auto => format!("{}ns", nanos),
        DurationUnit::Us => format!("{:.3}us", nanos as f64 / 1e3),
        DurationUnit::Ms => format!("{:.3}ms", nanos as f64 / 1e6),
        DurationUnit::S => format!("{:.3}s", nanos as f64 / 1e9),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        nanos: Option<i64>,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("name", |r: &Row| Ok(Cell::Text(r.name.to_string()))),
            Column::new("time", |r: &Row| Ok(r.nanos.map_or(Cell::Empty, Cell::Nanos))),
        ]
    }

    #[test]
    fn test_format_nanos_auto() {
        assert_eq!(format_nanos(999, DurationUnit::Auto), "999ns");
        assert_eq!(format_nanos(1_500, DurationUnit::Auto), "1.500us");
        assert_eq!(format_nanos(2_000_000, DurationUnit::Auto), "2.000ms");
        assert_eq!(format_nanos(-3_000_000_000, DurationUnit::Auto), "-3.000s");
        assert_eq!(format_nanos(42, DurationUnit::Ms), "0.000ms");
    }

    #[test]
    fn test_build_table() {
        let rows = vec![
            Row { name: "a", nanos: Some(5) },
            Row { name: "b", nanos: None },
        ];
        let table = Table::build("T", &columns(), &rows).unwrap();

        assert_eq!(table.headers, vec!["name", "time"]);
        assert_eq!(table.rows[1][1], Cell::Empty);
        assert_eq!(table.column_index("time"), Some(1));
    }

    #[test]
    fn test_build_table_propagates_extractor_error() {
        let columns: Vec<Column<Row>> = vec![Column::new("x", |r: &Row| {
            Err(ReportError::MissingCorrelatedMonitor {
                tag: "x".to_string(),
                operation: r.name.to_string(),
            })
        })];
        let rows = vec![Row { name: "a", nanos: None }];
        assert!(Table::build("T", &columns, &rows).is_err());
    }

    #[test]
    fn test_text_renderer_aligns_columns() {
        let rows = vec![
            Row { name: "alpha", nanos: Some(5) },
            Row { name: "b", nanos: None },
        ];
        let table = Table::build("Timings", &columns(), &rows).unwrap();
        let mut renderer = TextRenderer::new(Vec::new(), DurationUnit::Ns);
        renderer.render(&table).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.starts_with("  Timings\n"));
        assert!(text.contains("┃ alpha ┃  5ns ┃"));
        assert!(text.contains("┃ b     ┃      ┃"));
    }
}
