//! Vendor file reader for CSV and JSON DTC datasets

use crate::error::{Error, Result};
use crate::record::VendorRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Supported vendor file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "json" => Some(SourceFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Json => "json",
        }
    }
}

/// Read a vendor file into records, dispatching on its extension.
///
/// Files with an unsupported extension are skipped with a warning and yield
/// no records.
pub fn read_vendor_file<P: AsRef<Path>>(path: P) -> Result<Vec<VendorRecord>> {
    let path = path.as_ref();
    match SourceFormat::from_path(path) {
        Some(format) => read_as(path, format),
        None => {
            tracing::warn!(path = %path.display(), "Skipping unsupported file");
            Ok(Vec::new())
        }
    }
}

/// Read a vendor file with an explicit format
pub fn read_as(path: &Path, format: SourceFormat) -> Result<Vec<VendorRecord>> {
    let bytes = fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| Error::Encoding {
        path: path.to_path_buf(),
    })?;

    let records = match format {
        SourceFormat::Csv => read_csv_str(&content, path)?,
        SourceFormat::Json => read_json_str(&content, path)?,
    };

    tracing::debug!(
        path = %path.display(),
        format = ?format,
        records = records.len(),
        "Read vendor file"
    );
    Ok(records)
}

/// Parse CSV content with a header row into records
pub fn read_csv_str(content: &str, source: &Path) -> Result<Vec<VendorRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Ragged rows are mapped, not rejected
        .from_reader(strip_bom(content).as_bytes());

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::Csv {
            path: source.to_path_buf(),
            source: e,
        })?
        .clone();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result.map_err(|e| Error::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;

        if !row.is_empty() && row.len() != headers.len() {
            tracing::debug!(
                path = %source.display(),
                line = row.position().map(|p| p.line()),
                expected = headers.len(),
                found = row.len(),
                "Ragged CSV row"
            );
        }

        records.push(VendorRecord::from_csv(&headers, &row));
    }

    Ok(records)
}

/// Parse JSON content into records.
///
/// Accepts a bare array of objects or an object with a `rows` array. Any
/// other shape yields no records.
pub fn read_json_str(content: &str, source: &Path) -> Result<Vec<VendorRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(strip_bom(content)).map_err(|e| Error::JsonParse {
            path: source.to_path_buf(),
            source: e,
        })?;

    let rows = match value {
        serde_json::Value::Object(mut object) => match object.remove("rows") {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        },
        other => other,
    };

    let serde_json::Value::Array(items) = rows else {
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(object) => records.push(VendorRecord::from_json_object(object)),
            None => tracing::warn!(
                path = %source.display(),
                index,
                "Skipping JSON row that is not an object"
            ),
        }
    }

    Ok(records)
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}
