//! File naming rules tying before images, after images and results together.
//!
//! A before file `scan.jpg` has the base name `scan`. Its after image must be
//! `scan_w.tif` in the after directory, and its results are written as
//! `scan_result.tif` / `scan_result.png` in the results directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;

pub const DEFAULT_AFTER_SUFFIX: &str = "_w.tif";
pub const RESULT_SUFFIX: &str = "_result";

/// File name with its last extension removed.
///
/// `photo1.jpg` gives `photo1`, `archive.tar.gz` gives `archive.tar`. Leading
/// dots never start an extension, so `.hidden` and `..hidden` are returned
/// unchanged.
pub fn base_name(file_name: &str) -> &str {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading_dots..].rfind('.') {
        Some(dot) => &file_name[..leading_dots + dot],
        None => file_name,
    }
}

pub fn after_file_name(base_name: &str, after_suffix: &str) -> String {
    format!("{base_name}{after_suffix}")
}

/// Where the after image for `before_file` is expected to be
pub fn after_image_path(after_dir: &Path, before_file: &str, after_suffix: &str) -> PathBuf {
    after_dir.join(after_file_name(base_name(before_file), after_suffix))
}

/// Common prefix of every result file for `before_file`
pub fn result_prefix(results_dir: &Path, before_file: &str) -> PathBuf {
    results_dir.join(base_name(before_file))
}

/// `<prefix>_result.<ext>`
pub fn result_path(prefix: &Path, format: OutputFormat) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(RESULT_SUFFIX);
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}
