use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    config::OutputFormat,
    error::{DiffError, Result},
    naming,
    types::ComputedDifference,
};

impl ComputedDifference {
    /// Write the annotated canvas once per format as `<prefix>_result.<ext>`.
    ///
    /// Existing files are overwritten. Returns the written paths in format order.
    pub fn save<P: AsRef<Path>>(&self, prefix: P, formats: &[OutputFormat]) -> Result<Vec<PathBuf>> {
        let prefix = prefix.as_ref();
        let mut written = Vec::with_capacity(formats.len());

        for &format in formats {
            let path = naming::result_path(prefix, format);
            self.canvas
                .save_with_format(&path, format.image_format())
                .map_err(|source| DiffError::ImageSave {
                    path: path.clone(),
                    source,
                })?;
            info!("Saved {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage};

    fn sample_difference() -> ComputedDifference {
        let mut canvas = RgbImage::from_pixel(16, 8, Rgb([40, 40, 40]));
        canvas.put_pixel(3, 3, Rgb([200, 200, 0]));
        ComputedDifference {
            mask: GrayImage::new(16, 8),
            contours: Vec::new(),
            canvas,
            image_width: 16,
            image_height: 8,
        }
    }

    #[test]
    fn test_save_writes_identical_pixels_per_format() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("scan");

        let written = sample_difference()
            .save(&prefix, &[OutputFormat::Tif, OutputFormat::Png])
            .expect("Should save results");

        assert_eq!(written, vec![dir.path().join("scan_result.tif"), dir.path().join("scan_result.png")]);
        let tif = image::open(&written[0]).unwrap().to_rgb8();
        let png = image::open(&written[1]).unwrap().to_rgb8();
        assert_eq!(tif, png);
        assert_eq!(*png.get_pixel(3, 3), Rgb([200, 200, 0]));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("missing").join("scan");

        let result = sample_difference().save(&prefix, &[OutputFormat::Png]);
        assert!(matches!(result, Err(DiffError::ImageSave { .. })));
    }
}
