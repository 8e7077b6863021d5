//! Spreadsheet cell tree and table extraction.
//!
//! OpenDocument spreadsheets compress runs of identical cells and rows with
//! `number-columns-repeated` / `number-rows-repeated` and pad every row up to
//! the last used column. [`expand`] undoes the compression, [`prune`] drops
//! the padding, and [`read_rows`] turns a named table into data rows.

use crate::logs::log_warning;

/// Repeat counts above this are treated as 1. Such runs only ever pad a row
/// or table up to the maximum sheet size.
pub const MAX_REPEAT: usize = 1000;

// =============================================================================
// Tree
// =============================================================================

/// One table cell. Text is kept per paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Raw `number-columns-repeated` value, removed by [`expand`].
    pub repeat: Option<String>,
    pub paragraphs: Vec<String>,
}

impl Cell {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { repeat: None, paragraphs: vec![text.into()] }
    }

    pub fn repeated(count: usize) -> Self {
        Self { repeat: Some(count.to_string()), paragraphs: Vec::new() }
    }

    /// Trimmed cell text, paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n").trim().to_string()
    }

    pub fn is_blank(&self) -> bool {
        self.paragraphs.iter().all(|p| p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Raw `number-rows-repeated` value, removed by [`expand`].
    pub repeat: Option<String>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { repeat: None, cells }
    }

    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(Cell::text).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub rows: Vec<Row>,
}

/// All tables of a spreadsheet, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub tables: Vec<Table>,
}

// =============================================================================
// Normalization
// =============================================================================

fn repeat_count(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return 1;
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > MAX_REPEAT => 1,
        Ok(n) if n >= 1 => n,
        _ => {
            log_warning(format!("Ignoring invalid repeat count '{}'", raw));
            1
        }
    }
}

/// Replace every repeated cell and row by that many plain clones.
pub fn expand(mut sheet: Sheet) -> Sheet {
    for table in &mut sheet.tables {
        let mut rows = Vec::with_capacity(table.rows.len());
        for mut row in table.rows.drain(..) {
            let mut cells = Vec::with_capacity(row.cells.len());
            for mut cell in row.cells.drain(..) {
                let count = repeat_count(cell.repeat.take().as_deref());
                cells.extend(std::iter::repeat(cell).take(count));
            }
            row.cells = cells;

            let count = repeat_count(row.repeat.take().as_deref());
            rows.extend(std::iter::repeat(row).take(count));
        }
        table.rows = rows;
    }
    sheet
}

/// Drop blank trailing cells of every row, then cell-less trailing rows of
/// every table. The result is a fixpoint: pruning it again changes nothing.
pub fn prune(mut sheet: Sheet) -> Sheet {
    for table in &mut sheet.tables {
        for row in &mut table.rows {
            while row.cells.last().is_some_and(Cell::is_blank) {
                row.cells.pop();
            }
        }
        while table.rows.last().is_some_and(|r| r.cells.is_empty()) {
            table.rows.pop();
        }
    }
    sheet
}

// =============================================================================
// Lookup
// =============================================================================

pub fn find_table<'a>(sheet: &'a Sheet, name: &str) -> Option<&'a Table> {
    sheet.tables.iter().find(|t| t.name == name)
}

pub fn find_table_by_prefix<'a>(sheet: &'a Sheet, prefix: &str) -> Option<&'a Table> {
    sheet.tables.iter().find(|t| t.name.starts_with(prefix))
}

/// Text of the cell at `position` (1-based) in the first row containing a
/// cell whose text equals `title`. Empty if there is no such cell.
pub fn text_in_row(table: &Table, title: &str, position: usize) -> String {
    table
        .rows
        .iter()
        .find(|row| row.cells.iter().any(|c| c.text() == title))
        .and_then(|row| row.cells.get(position.saturating_sub(1)))
        .map(Cell::text)
        .unwrap_or_default()
}

/// How a header row is recognized by its first cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    /// First cell equals the label
    Exact(&'static str),
    /// First cell starts with the label
    Prefix(&'static str),
}

impl Header {
    pub fn matches(&self, first: &str) -> bool {
        match self {
            Header::Exact(label) => first == *label,
            Header::Prefix(label) => first.starts_with(label),
        }
    }
}

/// Shape of one documentation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    /// Name used in messages
    pub label: &'static str,
    pub header: Header,
    pub min_columns: usize,
}

/// Data rows of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRows {
    pub rows: Vec<Vec<String>>,
    /// Some row had content but was neither a header nor a complete data row,
    /// or the table has at most one row.
    pub missing_data: bool,
}

pub fn read_rows(table: &Table, spec: &TableSpec) -> TableRows {
    let mut result = TableRows::default();
    for row in &table.rows {
        let texts = row.texts();
        let first = texts.first().map(String::as_str).unwrap_or("");
        if spec.header.matches(first) {
            continue;
        }
        if texts.len() >= spec.min_columns && !first.is_empty() {
            result.rows.push(texts);
        } else if !texts.is_empty() {
            result.missing_data = true;
        }
    }
    if table.rows.len() <= 1 {
        result.missing_data = true;
    }
    result
}
