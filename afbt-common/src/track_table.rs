//! Track list tables with arbitrary columns
//!
//! **Purpose:** Read and write track list CSV files while keeping every
//! column, known or not, in its original order. Used by the tools that
//! filter, package or import track lists rather than generate them.

use crate::{Error, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Header plus rows of a track list, every row as wide as the header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl TrackTable {
    pub fn new<I, T>(headers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            headers: headers.into_iter().collect(),
            rows: Vec::new(),
        }
    }

    /// Read a table from any reader; short rows are padded with empty fields
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut table = Self {
            headers: csv_reader.headers()?.clone(),
            rows: Vec::new(),
        };
        for record in csv_reader.records() {
            table.push(record?);
        }
        Ok(table)
    }

    /// Load a track list file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::InvalidInput(format!("Cannot open {}: {}", path.display(), e)))?;

        let table = Self::read(file)?;
        info!(path = %path.display(), rows = table.len(), "Loaded track list");
        Ok(table)
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Position of a column the caller cannot do without
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| Error::InvalidInput(format!("Missing required column '{}'", name)))
    }

    /// Position of a column, appending it when absent
    pub fn ensure_column(&mut self, name: &str) -> usize {
        match self.column(name) {
            Some(index) => index,
            None => {
                self.headers.push_field(name);
                for row in &mut self.rows {
                    row.push_field("");
                }
                self.headers.len() - 1
            }
        }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push(&mut self, mut row: StringRecord) {
        let width = self.headers.len();
        if row.len() > width {
            row.truncate(width);
        }
        while row.len() < width {
            row.push_field("");
        }
        self.rows.push(row);
    }

    /// Write the table with a `\n` line terminator
    pub fn write<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_keeps_unknown_columns() {
        let table = TrackTable::read("track_id,genre,track_file\n1,rock,a.mp3\n".as_bytes()).unwrap();
        assert_eq!(table.headers().iter().collect::<Vec<_>>(), vec!["track_id", "genre", "track_file"]);
        assert_eq!(table.column("genre"), Some(1));
        assert_eq!(table.rows()[0].get(1), Some("rock"));
    }

    #[test]
    fn test_short_rows_padded() {
        let table = TrackTable::read("track_id,track_file\n1\n".as_bytes()).unwrap();
        assert_eq!(table.rows()[0].len(), 2);
        assert_eq!(table.rows()[0].get(1), Some(""));
    }

    #[test]
    fn test_require_column() {
        let table = TrackTable::new(["track_id"]);
        assert_eq!(table.require_column("track_id").unwrap(), 0);
        assert!(matches!(table.require_column("track_file"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_ensure_column_extends_rows() {
        let mut table = TrackTable::read("track_id\n1\n2\n".as_bytes()).unwrap();
        assert_eq!(table.ensure_column("track_id"), 0);
        assert_eq!(table.ensure_column("track_file"), 1);
        assert!(table.rows().iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_write_quotes_and_terminates() {
        let mut table = TrackTable::new(["track_id", "title"]);
        table.push(StringRecord::from(vec!["1", "Hello, world"]));

        let mut buffer = Vec::new();
        table.write(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "track_id,title\n1,\"Hello, world\"\n");
    }
}
