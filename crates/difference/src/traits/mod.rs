use image::{GrayImage, RgbImage};
use crate::{error::Result, types::Contour};

/// Trait for combining a before/after pair into a single difference image
pub trait DifferenceOperator: Send + Sync {
    /// Both images are guaranteed to have the same dimensions
    fn difference(&self, before: &GrayImage, after: &GrayImage) -> Result<GrayImage>;
}

/// Trait for image preprocessing algorithms
pub trait ImagePreprocessor: Send + Sync {
    /// Preprocess the difference image (e.g., threshold it into a binary mask)
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract contours from a binary image
    fn extract_contours(&self, image: &GrayImage) -> Result<Vec<Contour>>;
}

/// Trait for drawing contours onto the result canvas
pub trait ContourRenderer: Send + Sync {
    fn render(&self, canvas: &mut RgbImage, contours: &[Contour]) -> Result<()>;
}
