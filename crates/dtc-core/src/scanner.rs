//! Expands input paths into the vendor files to import

use crate::error::Result;
use crate::reader::SourceFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand input paths into an ordered list of vendor files.
///
/// Plain paths are kept as given, even if they do not exist or have an
/// unsupported extension, so the reader can report them. Directories are
/// walked recursively and contribute their CSV and JSON files in sorted
/// order.
pub fn expand_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            files.push(input.to_path_buf());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(input).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && SourceFormat::from_path(path).is_some() {
                found.push(path.to_path_buf());
            }
        }
        found.sort();

        tracing::debug!(dir = %input.display(), files = found.len(), "Expanded input directory");
        files.extend(found);
    }

    Ok(files)
}
