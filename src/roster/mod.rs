//! Attendee roster reader.
//!
//! Reads a CSV roster with a header row. Header names are normalized
//! to lowercase symbols (`first_Name` becomes `first_name`) so the
//! lookups below do not depend on the capitalization used in the file.

use crate::models::AttendeeRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to open roster {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("roster header row is invalid: {0}")]
    Header(#[source] csv::Error),

    #[error("roster is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("roster row {line} is malformed: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    first_name: usize,
    zipcode: Option<usize>,
    homephone: Option<usize>,
    regdate: Option<usize>,
}

/// A roster opened for a single pass.
pub struct Roster<R> {
    reader: csv::Reader<R>,
    columns: Columns,
}

impl Roster<File> {
    /// Open a roster file from disk.
    pub fn open(path: &Path) -> Result<Self, RosterError> {
        let file = File::open(path).map_err(|source| RosterError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }
}

impl<R: Read> Roster<R> {
    pub fn from_reader(input: R) -> Result<Self, RosterError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers: Vec<String> = reader
            .byte_headers()
            .map_err(RosterError::Header)?
            .iter()
            .map(|h| normalize_header(&String::from_utf8_lossy(h)))
            .collect();
        debug!("Roster columns: {:?}", headers);

        let position = |name: &str| headers.iter().position(|h| h == name);

        let columns = Columns {
            first_name: position("first_name").ok_or(RosterError::MissingColumn("first_name"))?,
            zipcode: position("zipcode"),
            homephone: position("homephone"),
            regdate: position("regdate"),
        };

        Ok(Self { reader, columns })
    }

    /// Iterate over the attendee rows in file order.
    ///
    /// Fields are decoded lossily, so a row in a legacy encoding still
    /// yields a record. Only CSV framing errors are yielded as errors, so
    /// the caller can skip them and keep going.
    pub fn records(&mut self) -> impl Iterator<Item = Result<AttendeeRecord, RosterError>> + '_ {
        let columns = self.columns;

        self.reader
            .byte_records()
            .map(move |row| -> Result<AttendeeRecord, RosterError> {
                let row = row.map_err(|source| RosterError::Row {
                    line: source.position().map(|p| p.line()).unwrap_or(0),
                    source,
                })?;

                let field = |index: Option<usize>| {
                    index
                        .and_then(|i| row.get(i))
                        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                        .unwrap_or_default()
                };

                Ok(AttendeeRecord {
                    id: field(Some(0)),
                    first_name: field(Some(columns.first_name)),
                    zipcode: field(columns.zipcode),
                    homephone: field(columns.homephone),
                    regdate: field(columns.regdate),
                })
            })
    }
}

/// Normalize a header the way symbol header converters do: lowercase,
/// drop punctuation, and join words with underscores.
pub fn normalize_header(header: &str) -> String {
    let kept: String = header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("_")
}
