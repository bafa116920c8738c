//! Import plans: a serializable description of one import run
//!
//! This module provides:
//! - The plan file format (JSON) naming inputs, output and merge settings
//! - `run_import`, which drives expand -> merge -> write for a plan

use crate::error::{Error, Result};
use crate::merger::{merge_files, FieldMap, MergeConfig, MergeReport, DEFAULT_LICENSE};
use crate::record::Language;
use crate::scanner::expand_inputs;
use crate::writer::{write_seed_csv, WriteOutcome};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One import run: which files to read, where to write, and how to map rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPlan {
    /// Vendor files or directories, merged in this order
    pub inputs: Vec<PathBuf>,
    /// Seed CSV to create or append to
    pub out_csv: PathBuf,
    /// Append to `out_csv` if it exists instead of overwriting it
    #[serde(default)]
    pub append: bool,
    /// Manufacturer slug (e.g. "toyota", "bosch")
    pub manufacturer: String,
    /// Language of the vendor descriptions
    #[serde(default)]
    pub lang: Language,
    /// Vendor field names
    #[serde(default)]
    pub fields: FieldMap,
    /// System override; inferred from the code prefix when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// License note written on every row
    #[serde(default = "default_license")]
    pub license: String,
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

impl ImportPlan {
    /// Create a plan with default language, fields and license
    pub fn new(
        inputs: Vec<PathBuf>,
        out_csv: impl Into<PathBuf>,
        manufacturer: impl Into<String>,
    ) -> Self {
        Self {
            inputs,
            out_csv: out_csv.into(),
            append: false,
            manufacturer: manufacturer.into(),
            lang: Language::default(),
            fields: FieldMap::default(),
            system: None,
            license: default_license(),
        }
    }

    /// Load a plan file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the plan file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Merge settings shared by every row of this run
    pub fn merge_config(&self) -> MergeConfig {
        MergeConfig::new(self.manufacturer.clone())
            .with_language(self.lang)
            .with_fields(self.fields.clone())
            .with_system(self.system.clone())
            .with_license(self.license.clone())
    }
}

/// Result of running an import plan
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Merged rows and per-file counts
    pub report: MergeReport,
    /// Write details, None when no rows survived and nothing was written
    pub written: Option<WriteOutcome>,
}

impl ImportOutcome {
    /// Number of rows imported into the seed CSV
    pub fn imported(&self) -> usize {
        self.written.map(|w| w.rows_written).unwrap_or(0)
    }
}

/// Run a plan: expand inputs, merge them, and write the seed CSV.
///
/// Any read error aborts the run before the output is touched. When no rows
/// survive the merge the output file is left alone.
pub fn run_import(plan: &ImportPlan) -> Result<ImportOutcome> {
    if plan.inputs.is_empty() {
        return Err(Error::InvalidConfig("at least one input is required".to_string()));
    }

    let config = plan.merge_config();
    let files = expand_inputs(&plan.inputs)?;
    let report = merge_files(&files, &config)?;

    if report.is_empty() {
        tracing::info!(files = files.len(), "Merge produced no rows, output left untouched");
        return Ok(ImportOutcome {
            report,
            written: None,
        });
    }

    let written = write_seed_csv(&report.rows, &plan.out_csv, plan.append)?;

    Ok(ImportOutcome {
        report,
        written: Some(written),
    })
}
