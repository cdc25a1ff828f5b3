//! Flat article index
//!
//! One row per article, carrying the keys and titles of every enclosing
//! structural unit. Rows are accepted in non-decreasing article-number order
//! only; anything that goes backwards is an editorial remark repeating an
//! earlier article and is left out of the table.

use super::heading_key::article_number;
use crate::keywords::KeywordTaxonomy;
use indexmap::IndexMap;
use itertools::Itertools;
use std::io;

/// Column holding the normalized article key
pub const ARTICLE_COLUMN: &str = "article";

/// Column holding the flattened article text
pub const TEXT_COLUMN: &str = "text";

/// Placeholder written in place of newlines unless configured otherwise
pub const DEFAULT_NEWLINE_PLACEHOLDER: &str = "\\n";

/// One article with its ancestor chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: IndexMap<String, String>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any previous value in that column
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Column names present in this row, in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Article number of this row, when its key is numeric
    pub fn article_number(&self) -> Option<u64> {
        self.get(ARTICLE_COLUMN).and_then(article_number)
    }
}

/// Replace newlines so article text fits in a single table cell
///
/// Trailing newlines are dropped first so rows do not end in a placeholder.
pub fn flatten_text(text: &str, placeholder: &str) -> String {
    text.trim_end_matches(['\r', '\n'])
        .replace("\r\n", "\n")
        .replace('\n', placeholder)
}

/// Rows collected while parsing, before column ordering
#[derive(Debug, Clone, Default)]
pub struct ArticleTable {
    rows: Vec<TableRow>,
    last_article: Option<u64>,
}

impl ArticleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row unless its article number goes backwards
    ///
    /// Rows whose article key is not numeric cannot be ordered; they are
    /// appended without moving the last seen article number.
    ///
    /// # Returns
    /// * `true` - The row was appended
    /// * `false` - The row was out of order and dropped
    pub fn push(&mut self, row: TableRow) -> bool {
        let number = row.article_number();

        if let (Some(number), Some(last)) = (number, self.last_article) {
            if number < last {
                log::debug!(
                    "Dropping out-of-order article {} (previous {})",
                    number,
                    last
                );
                return false;
            }
        }

        if number.is_some() {
            self.last_article = number;
        }
        self.rows.push(row);
        true
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fix the column order against the taxonomy
    pub fn into_ordered(self, taxonomy: &KeywordTaxonomy) -> OrderedTable {
        let present: Vec<&str> = self
            .rows
            .iter()
            .flat_map(TableRow::columns)
            .unique()
            .collect();
        let columns = column_order(&present, taxonomy);

        OrderedTable {
            columns,
            rows: self.rows,
        }
    }
}

/// Derive the output column order from the taxonomy's levels
///
/// Kinds are visited shallowest first; each kind present among `present`
/// contributes its key column followed by its `_name` column. Columns the
/// taxonomy does not cover keep their first-seen order, and `text` goes last.
///
/// # Parameters
/// * `present` - Column names found in the rows, in first-seen order
/// * `taxonomy` - Keyword taxonomy providing the level ordering
pub fn column_order(present: &[&str], taxonomy: &KeywordTaxonomy) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(present.len());

    for kind in taxonomy.kinds_by_level() {
        if !present.contains(&kind.as_str()) {
            continue;
        }
        ordered.push(kind.as_str().to_string());

        let name_column = kind.name_column();
        if present.contains(&name_column.as_str()) {
            ordered.push(name_column);
        }
    }

    let leftovers: Vec<String> = present
        .iter()
        .filter(|column| {
            **column != TEXT_COLUMN && !ordered.iter().any(|c| c.as_str() == **column)
        })
        .map(|column| column.to_string())
        .collect();
    ordered.extend(leftovers);

    if present.contains(&TEXT_COLUMN) {
        ordered.push(TEXT_COLUMN.to_string());
    }

    ordered
}

/// Article table with its final column order
#[derive(Debug, Clone, Default)]
pub struct OrderedTable {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl OrderedTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of every row in column order; missing cells are empty
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .map(|column| row.get(column).unwrap_or(""))
                .collect()
        })
    }

    /// Write the table as CSV with a header row
    ///
    /// # Parameters
    /// * `writer` - Destination for the CSV bytes
    ///
    /// # Returns
    /// * `Ok(())` - All rows were written and flushed
    /// * `Err(csv::Error)` - Error writing to `writer`
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for record in self.records() {
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
