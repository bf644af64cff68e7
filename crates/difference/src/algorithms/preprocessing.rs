use image::GrayImage;
use crate::{error::Result, traits::ImagePreprocessor};

/// Intensity differences at or below this are treated as noise.
pub const DEFAULT_THRESHOLD: u8 = 30;

/// Binary thresholding preprocessor.
///
/// Samples strictly greater than `threshold` become 255, everything else 0.
#[derive(Debug, Clone)]
pub struct ThresholdPreprocessor {
    pub threshold: u8,
}

impl Default for ThresholdPreprocessor {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD }
    }
}

impl ImagePreprocessor for ThresholdPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::contrast::threshold(image, self.threshold))
    }
}
