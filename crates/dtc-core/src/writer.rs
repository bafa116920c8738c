//! Seed CSV writer with create and append modes

use crate::error::{Error, Result};
use crate::record::{CanonicalRow, HEADERS};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// How the output file was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Truncated or newly created, header written first
    Create,
    /// Extended in place, header not repeated
    Append,
}

impl WriteMode {
    /// Append only when requested and the file is already there
    pub fn select(path: &Path, append: bool) -> Self {
        if append && path.exists() {
            WriteMode::Append
        } else {
            WriteMode::Create
        }
    }

    fn writes_header(&self) -> bool {
        matches!(self, WriteMode::Create)
    }
}

/// Result of writing the seed CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub mode: WriteMode,
    pub rows_written: usize,
}

/// Write rows to the seed CSV at `path`, creating or appending to it
pub fn write_seed_csv<P: AsRef<Path>>(
    rows: &[CanonicalRow],
    path: P,
    append: bool,
) -> Result<WriteOutcome> {
    let path = path.as_ref();
    let mode = WriteMode::select(path, append);

    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Append => options.append(true),
        WriteMode::Create => options.write(true).create(true).truncate(true),
    };
    let file = options.open(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rows_written =
        write_rows(BufWriter::new(file), rows, mode.writes_header()).map_err(|e| {
            Error::CsvWrite {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

    tracing::info!(
        path = %path.display(),
        mode = ?mode,
        rows = rows_written,
        "Wrote seed CSV"
    );

    Ok(WriteOutcome { mode, rows_written })
}

/// Serialize rows in header order to any writer, optionally with the header.
///
/// Records end in CRLF so appends match seeds written by earlier tooling.
pub fn write_rows<W: Write>(
    writer: W,
    rows: &[CanonicalRow],
    header: bool,
) -> std::result::Result<usize, csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    if header {
        csv_writer.write_record(HEADERS)?;
    }
    for row in rows {
        csv_writer.write_record(row.values())?;
    }
    csv_writer.flush()?;

    Ok(rows.len())
}
