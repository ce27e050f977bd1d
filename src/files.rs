//! File path helpers.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::INSV_EXTENSIONS;

/// Returns file extension as lower case string.
pub fn fileext_to_lcstring(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Returns lower case extension if it is one of `ext`
/// (lower case, without leading `.`).
pub fn has_extension(path: &Path, ext: &[&str]) -> Option<String> {
    fileext_to_lcstring(path)
        .filter(|e| ext.contains(&e.as_str()))
}

/// Expand inputs into INSV file paths.
/// Directories are searched recursively for
/// `.insv`, `.insp`, and `.lrv` files, other paths are kept as is.
pub fn insv_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    inputs.iter()
        .flat_map(|input| {
            if input.is_dir() {
                WalkDir::new(input)
                    .sort_by_file_name()
                    .into_iter()
                    // Ignore errors, often due to lack of read permissions
                    .filter_map(|result| result.ok())
                    .map(|entry| entry.into_path())
                    .filter(|p| p.is_file() && has_extension(p, INSV_EXTENSIONS).is_some())
                    .collect::<Vec<_>>()
            } else {
                vec![input.to_owned()]
            }
        })
        .collect()
}

/// Output path in the current directory: input file name with `suffix` appended,
/// e.g. `VID_001.insv` -> `VID_001.insv.meta.json`.
pub fn affix_file_name(input: &Path, suffix: &str) -> PathBuf {
    let name = input.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    PathBuf::from(format!("{name}{suffix}"))
}
