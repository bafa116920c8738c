//! dtc-core: Core library for importing vendor DTC datasets into a seed CSV
//!
//! This library provides functionality to:
//! - Read vendor CSV and JSON files into loosely-typed records
//! - Normalize DTC codes and infer their vehicle system
//! - Map records onto the bilingual seed schema, keeping the first row per code
//! - Create or append to the seed CSV

pub mod error;
pub mod merger;
pub mod normalize;
pub mod plan;
pub mod reader;
pub mod record;
pub mod scanner;
pub mod writer;

pub use error::{Error, Result};
pub use merger::{merge_files, FieldMap, MergeConfig, MergeReport, Merger, SourceSummary, DEFAULT_LICENSE};
pub use normalize::{infer_system, normalize_code};
pub use plan::{run_import, ImportOutcome, ImportPlan};
pub use reader::{read_vendor_file, SourceFormat};
pub use record::{CanonicalRow, Language, SystemCategory, VendorRecord, HEADERS};
pub use scanner::expand_inputs;
pub use writer::{write_seed_csv, WriteMode, WriteOutcome};
