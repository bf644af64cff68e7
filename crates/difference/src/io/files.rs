use std::fs;
use std::path::Path;

use image::GrayImage;
use tracing::warn;

use crate::error::{DiffError, Result};

/// List the names of the regular files directly inside `directory_path`.
///
/// Subdirectories and special entries are skipped. Names are sorted so a batch
/// always walks the directory in the same order.
pub fn list_files_in_directory<P: AsRef<Path>>(directory_path: P) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(directory_path.as_ref())? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => files.push(name),
            Err(name) => warn!("Skipping file with non UTF-8 name: {:?}", name),
        }
    }

    files.sort();
    Ok(files)
}

/// Create `directory_path` and any missing parents. Existing directories are left alone.
pub fn ensure_directory_exists<P: AsRef<Path>>(directory_path: P) -> Result<()> {
    fs::create_dir_all(directory_path.as_ref())?;
    Ok(())
}

/// Decode an image file and convert it to 8-bit grayscale
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| DiffError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_luma8())
}
