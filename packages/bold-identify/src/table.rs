//! Tables of flattened match records.
//!
//! Rows may carry different sets of columns. [`TableBuilder`] computes the
//! union of all column names (in first-seen order) before materializing the
//! table, and fills cells a row does not provide with `None`.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::types::{MatchRecord, MATCH_FIELDS, SPECIMEN_FIELDS};

/// Marker written for null cells in text and delimited output.
pub const NULL_MARKER: &str = "NA";

/// A rectangular table with nullable string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table from match records.
    ///
    /// The ten record columns are always present, so an empty record list
    /// yields a table with the full schema and no rows.
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let mut builder = TableBuilder::with_columns(MATCH_FIELDS.iter().chain(&SPECIMEN_FIELDS));
        for record in records {
            builder.push_record(record);
        }
        builder.build()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of a single cell; `None` for null cells and unknown columns.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    /// All values of one column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].as_deref()).collect())
    }

    /// Write the table as delimited text with a header line.
    ///
    /// Null cells are written as [`NULL_MARKER`].
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        out.write_record(&self.columns)?;
        for row in &self.rows {
            out.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or(NULL_MARKER)))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Render the table as aligned plain text.
    pub fn to_text(&self) -> String {
        let cell = |value: &Option<String>| value.as_deref().unwrap_or(NULL_MARKER).to_string();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (width, value) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell(value).chars().count());
            }
        }

        let format_line = |values: Vec<String>| {
            values
                .iter()
                .zip(&widths)
                .map(|(value, &width)| format!("{value:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![format_line(self.columns.clone())];
        for row in &self.rows {
            lines.push(format_line(row.iter().map(cell).collect()));
        }
        lines.join("\n")
    }
}

impl Serialize for Table {
    /// Serializes as a list of row objects; null cells become `null`.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct Row<'a>(&'a [String], &'a [Option<String>]);

        impl Serialize for Row<'_> {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (column, value) in self.0.iter().zip(self.1) {
                    map.serialize_entry(column, value)?;
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Row(&self.columns, row))?;
        }
        seq.end()
    }
}

/// Collects heterogeneous rows and materializes them into a [`Table`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    seed_columns: Vec<String>,
    rows: Vec<Vec<(String, Option<String>)>>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a fixed set of leading columns.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            seed_columns: columns.into_iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row given as `(column, value)` pairs.
    ///
    /// If a column appears twice in one row, the last value wins.
    pub fn push_row<I, K>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        self.rows
            .push(cells.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    /// Add the ten columns of a match record as a row.
    pub fn push_record(&mut self, record: &MatchRecord) -> &mut Self {
        self.push_row(
            record
                .fields()
                .into_iter()
                .map(|(name, value)| (name, value.map(str::to_string))),
        )
    }

    /// Compute the column union and fill missing cells with `None`.
    pub fn build(self) -> Table {
        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        let names = self
            .seed_columns
            .iter()
            .chain(self.rows.iter().flatten().map(|(name, _)| name));
        for name in names {
            if seen.insert(name.as_str()) {
                columns.push(name.clone());
            }
        }

        let index: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|cells| {
                let mut row = vec![None; columns.len()];
                for (name, value) in cells {
                    if let Some(&i) = index.get(name.as_str()) {
                        row[i] = value.clone();
                    }
                }
                row
            })
            .collect();

        Table { columns, rows }
    }
}
