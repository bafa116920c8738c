//! Merge engine: normalizes vendor records into seed rows with deduplication

use crate::error::{Error, Result};
use crate::normalize::{infer_system, normalize_code};
use crate::reader::{read_vendor_file, SourceFormat};
use crate::record::{CanonicalRow, Language, VendorRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// License note used when the run does not supply one
pub const DEFAULT_LICENSE: &str = "Imported vendor content - check original license";

/// Vendor field names to read each canonical value from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub code: String,
    pub description: String,
    /// Semicolon-separated causes
    pub causes: String,
    /// Semicolon-separated fixes
    pub fixes: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            code: "code".to_string(),
            description: "description".to_string(),
            causes: "causes".to_string(),
            fixes: "fixes".to_string(),
        }
    }
}

/// Run-wide settings applied to every record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Manufacturer slug stamped on every row (e.g. "bosch")
    pub manufacturer: String,
    /// Language of the vendor descriptions
    pub language: Language,
    /// Where to find each value in the vendor records
    pub fields: FieldMap,
    /// System written for every row instead of inferring it from the code
    pub system: Option<String>,
    /// License note written for every row
    pub license: String,
}

impl MergeConfig {
    /// Create a config with default fields, language and license
    pub fn new(manufacturer: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            language: Language::default(),
            fields: FieldMap::default(),
            system: None,
            license: DEFAULT_LICENSE.to_string(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_system(mut self, system: Option<String>) -> Self {
        self.system = system;
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    /// Check every vendor field name is usable.
    ///
    /// The manufacturer is taken verbatim, an empty slug included.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("code", &self.fields.code),
            ("description", &self.fields.description),
            ("causes", &self.fields.causes),
            ("fixes", &self.fields.fixes),
        ];
        for (role, name) in fields {
            if name.is_empty() {
                return Err(Error::InvalidConfig(format!("{} field name must not be empty", role)));
            }
        }

        Ok(())
    }

    /// Map one vendor record to a seed row. Returns None when the code is empty.
    pub fn normalize_record(&self, record: &VendorRecord) -> Option<CanonicalRow> {
        let code = normalize_code(record.get_or_empty(&self.fields.code));
        if code.is_empty() {
            return None;
        }

        let system = match &self.system {
            Some(system) => system.clone(),
            None => infer_system(&code).to_string(),
        };

        let description = record.get_or_empty(&self.fields.description).trim().to_string();
        let causes = record.get_or_empty(&self.fields.causes).trim().to_string();
        let fixes = record.get_or_empty(&self.fields.fixes).trim().to_string();

        let mut row = CanonicalRow {
            code,
            system,
            manufacturer: self.manufacturer.clone(),
            license: self.license.clone(),
            ..Default::default()
        };

        match self.language {
            Language::En => {
                row.title_en = description.clone();
                row.description_en = description;
                row.causes_en = causes;
                row.fixes_en = fixes;
            }
            Language::Tr => {
                row.title_tr = description.clone();
                row.description_tr = description;
                row.causes_tr = causes;
                row.fixes_tr = fixes;
            }
        }

        Some(row)
    }
}

/// Key rows are deduplicated on within a run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub manufacturer: String,
    pub code: String,
}

impl DedupKey {
    fn of(row: &CanonicalRow) -> Self {
        Self {
            manufacturer: row.manufacturer.clone(),
            code: row.code.clone(),
        }
    }
}

/// Per-file counts for one merge run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Input file path
    pub path: PathBuf,
    /// Detected format, None when the file was skipped as unsupported
    pub format: Option<SourceFormat>,
    /// Records read from the file
    pub records: usize,
    /// Rows kept in the output
    pub imported: usize,
    /// Rows dropped because their key was already seen
    pub duplicates: usize,
    /// Rows dropped because their code was empty
    pub skipped: usize,
}

/// The merged rows plus per-file provenance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// Rows in encounter order
    pub rows: Vec<CanonicalRow>,
    /// One entry per input file, in merge order
    pub sources: Vec<SourceSummary>,
}

impl MergeReport {
    /// Number of rows to be written
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total rows dropped as duplicates across all files
    pub fn duplicate_count(&self) -> usize {
        self.sources.iter().map(|s| s.duplicates).sum()
    }

    /// Total rows dropped for an empty code across all files
    pub fn skipped_count(&self) -> usize {
        self.sources.iter().map(|s| s.skipped).sum()
    }

    /// Input files that were skipped as unsupported
    pub fn unsupported(&self) -> impl Iterator<Item = &Path> {
        self.sources
            .iter()
            .filter(|s| s.format.is_none())
            .map(|s| s.path.as_path())
    }
}

/// Accumulates rows across input files, keeping the first row per key
#[derive(Debug)]
pub struct Merger<'a> {
    config: &'a MergeConfig,
    seen: HashSet<DedupKey>,
    report: MergeReport,
}

impl<'a> Merger<'a> {
    /// Create a merger for one run
    pub fn new(config: &'a MergeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seen: HashSet::new(),
            report: MergeReport::default(),
        })
    }

    /// Read a vendor file and merge its records
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let format = SourceFormat::from_path(path);
        let records = read_vendor_file(path)?;
        self.add_records(path, format, &records);
        Ok(())
    }

    /// Merge already-loaded records attributed to `path`
    pub fn add_records(&mut self, path: &Path, format: Option<SourceFormat>, records: &[VendorRecord]) {
        let mut summary = SourceSummary {
            path: path.to_path_buf(),
            format,
            records: records.len(),
            ..Default::default()
        };

        for (index, record) in records.iter().enumerate() {
            let Some(row) = self.config.normalize_record(record) else {
                tracing::debug!(path = %path.display(), index, "Skipping row with empty code");
                summary.skipped += 1;
                continue;
            };

            if self.seen.insert(DedupKey::of(&row)) {
                self.report.rows.push(row);
                summary.imported += 1;
            } else {
                tracing::debug!(path = %path.display(), index, code = %row.code, "Skipping duplicate code");
                summary.duplicates += 1;
            }
        }

        tracing::info!(
            path = %path.display(),
            records = summary.records,
            imported = summary.imported,
            duplicates = summary.duplicates,
            skipped = summary.skipped,
            "Merged vendor file"
        );
        self.report.sources.push(summary);
    }

    /// Finish the run and return the merged rows
    pub fn finish(self) -> MergeReport {
        self.report
    }
}

/// Merge vendor files in order into a single deduplicated row set
pub fn merge_files<P: AsRef<Path>>(inputs: &[P], config: &MergeConfig) -> Result<MergeReport> {
    let mut merger = Merger::new(config)?;
    for input in inputs {
        merger.add_file(input.as_ref())?;
    }
    Ok(merger.finish())
}
