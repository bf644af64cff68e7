pub mod builder;

use std::path::Path;

use image::{DynamicImage, GrayImage};
use tracing::debug;

use crate::{
    config::{DiffConfig, OutputFormat},
    error::{DiffError, Result},
    traits::{ContourExtractor, ContourRenderer, DifferenceOperator, ImagePreprocessor},
    types::ComputedDifference,
};

/// Before/after comparison: difference, preprocessing, contour extraction and overlay.
pub struct DifferencePipeline {
    difference: Box<dyn DifferenceOperator>,
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Box<dyn ContourExtractor>,
    renderer: Box<dyn ContourRenderer>,
    output_formats: Vec<OutputFormat>,
}

impl DifferencePipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Pipeline configured from the threshold, colour, thickness and formats of `config`
    pub fn from_config(config: &DiffConfig) -> Result<Self> {
        config.validate()?;
        Ok(builder::PipelineBuilder::from_config(config).build())
    }

    pub fn new(
        difference: Box<dyn DifferenceOperator>,
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        contour_extractor: Box<dyn ContourExtractor>,
        renderer: Box<dyn ContourRenderer>,
        output_formats: Vec<OutputFormat>,
    ) -> Self {
        Self {
            difference,
            preprocessors,
            contour_extractor,
            renderer,
            output_formats,
        }
    }

    pub fn output_formats(&self) -> &[OutputFormat] {
        &self.output_formats
    }

    /// Compare a pair without touching the filesystem
    pub fn compute(&self, before: &GrayImage, after: &GrayImage) -> Result<ComputedDifference> {
        if before.dimensions() != after.dimensions() {
            return Err(DiffError::ShapeMismatch {
                before: before.dimensions(),
                after: after.dimensions(),
            });
        }

        // Step 1: per-pixel difference
        let mut mask = self.difference.difference(before, after)?;

        // Step 2: turn the difference into a binary change mask
        for preprocessor in &self.preprocessors {
            mask = preprocessor.preprocess(&mask)?;
        }

        // Step 3: outline the changed regions
        let contours = self.contour_extractor.extract_contours(&mask)?;

        // Step 4: draw them over a colour copy of the before image
        let mut canvas = DynamicImage::ImageLuma8(before.clone()).to_rgb8();
        self.renderer.render(&mut canvas, &contours)?;

        let computed = ComputedDifference {
            mask,
            contours,
            canvas,
            image_width: before.width(),
            image_height: before.height(),
        };
        debug!(
            "{} contours over {} changed pixels",
            computed.contours.len(),
            computed.changed_pixels()
        );

        Ok(computed)
    }

    /// Compare a pair and write `<output_prefix>_result.<ext>` for every output format
    pub fn compute_and_save<P: AsRef<Path>>(
        &self,
        before: &GrayImage,
        after: &GrayImage,
        output_prefix: P,
    ) -> Result<ComputedDifference> {
        let computed = self.compute(before, after)?;
        computed.save(output_prefix, &self.output_formats)?;
        Ok(computed)
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: 1 difference operator, {} preprocessors, 1 contour extractor, 1 renderer, {} output formats",
            self.preprocessors.len(),
            self.output_formats.len()
        )
    }
}

impl Default for DifferencePipeline {
    fn default() -> Self {
        builder::PipelineBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::DEFAULT_HIGHLIGHT_COLOR;
    use image::{Luma, Rgb};

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x + y) % 200) as u8]))
    }

    fn with_patch(image: &GrayImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>, delta: u8) -> GrayImage {
        let mut out = image.clone();
        for y in ys {
            for x in xs.clone() {
                let value = out.get_pixel(x, y)[0];
                out.put_pixel(x, y, Luma([value + delta]));
            }
        }
        out
    }

    #[test]
    fn test_identical_images_produce_nothing() {
        let before = gradient(64, 48);
        let pipeline = DifferencePipeline::default();

        let result = pipeline.compute(&before, &before.clone()).expect("Should compute difference");

        assert!(result.mask.pixels().all(|p| p[0] == 0));
        assert!(result.contours.is_empty());
        assert!(!result.has_changes());
        assert_eq!(result.canvas, DynamicImage::ImageLuma8(before).to_rgb8());
    }

    #[test]
    fn test_single_rectangle_gives_one_contour() {
        let before = gradient(100, 80);
        let after = with_patch(&before, 20..45, 30..60, 50);
        let pipeline = DifferencePipeline::default();

        let result = pipeline.compute(&before, &after).expect("Should compute difference");

        assert_eq!(result.contours.len(), 1);
        let (min, max) = result.contours[0].bounding_box().expect("Contour should have points");
        assert!((min[0] - 20).abs() <= 1 && (min[1] - 30).abs() <= 1);
        assert!((max[0] - 44).abs() <= 1 && (max[1] - 59).abs() <= 1);
        assert_eq!(result.changed_pixels(), 25 * 30);

        let gold = Rgb(DEFAULT_HIGHLIGHT_COLOR);
        assert_eq!(*result.canvas.get_pixel(30, 30), gold);
        assert_ne!(*result.canvas.get_pixel(5, 5), gold);
    }

    #[test]
    fn test_threshold_boundary() {
        let before = GrayImage::from_pixel(40, 40, Luma([100]));
        let pipeline = DifferencePipeline::default();

        let at_threshold = with_patch(&before, 10..30, 10..30, 30);
        let result = pipeline.compute(&before, &at_threshold).expect("Should compute difference");
        assert_eq!(result.mask.get_pixel(20, 20)[0], 0);
        assert!(result.contours.is_empty());

        let above_threshold = with_patch(&before, 10..30, 10..30, 31);
        let result = pipeline.compute(&before, &above_threshold).expect("Should compute difference");
        assert_eq!(result.mask.get_pixel(20, 20)[0], 255);
        assert_eq!(result.contours.len(), 1);
    }

    #[test]
    fn test_change_at_image_corner_is_annotated() {
        let before = GrayImage::from_pixel(40, 40, Luma([100]));
        let after = with_patch(&before, 0..10, 0..10, 100);

        let result = DifferencePipeline::default().compute(&before, &after).expect("Should compute difference");

        assert_eq!(result.changed_pixels(), 100);
        assert_eq!(result.contours.len(), 1);
        assert_eq!(*result.canvas.get_pixel(0, 0), Rgb(DEFAULT_HIGHLIGHT_COLOR));
    }

    #[test]
    fn test_whole_image_change_is_annotated() {
        let before = GrayImage::from_pixel(40, 40, Luma([100]));
        let after = GrayImage::from_pixel(40, 40, Luma([200]));

        let result = DifferencePipeline::default().compute(&before, &after).expect("Should compute difference");

        assert_eq!(result.changed_pixels(), 1600);
        assert_eq!(result.contours.len(), 1);
        assert_eq!(*result.canvas.get_pixel(39, 20), Rgb(DEFAULT_HIGHLIGHT_COLOR));
        assert_eq!(*result.canvas.get_pixel(20, 20), Rgb([100, 100, 100]));
    }

    #[test]
    fn test_darker_after_image_is_detected() {
        let before = GrayImage::from_pixel(30, 30, Luma([180]));
        let mut after = before.clone();
        for y in 5..10 {
            for x in 5..10 {
                after.put_pixel(x, y, Luma([20]));
            }
        }

        let result = DifferencePipeline::default().compute(&before, &after).expect("Should compute difference");
        assert_eq!(result.contours.len(), 1);
    }

    #[test]
    fn test_shape_mismatch() {
        let pipeline = DifferencePipeline::default();
        let result = pipeline.compute(&GrayImage::new(10, 10), &GrayImage::new(10, 12));

        match result {
            Err(DiffError::ShapeMismatch { before, after }) => {
                assert_eq!(before, (10, 10));
                assert_eq!(after, (10, 12));
            }
            other => panic!("Expected ShapeMismatch, got {:?}", other.map(|r| r.contours)),
        }
    }

    #[test]
    fn test_shape_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("pair");

        let result = DifferencePipeline::default().compute_and_save(
            &GrayImage::new(8, 8),
            &GrayImage::new(9, 8),
            &prefix,
        );

        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_compute_and_save_writes_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let before = gradient(32, 32);
        let after = with_patch(&before, 4..12, 4..12, 60);

        DifferencePipeline::default()
            .compute_and_save(&before, &after, dir.path().join("pair"))
            .expect("Should save results");

        assert!(dir.path().join("pair_result.tif").is_file());
        assert!(dir.path().join("pair_result.png").is_file());
    }

    #[test]
    fn test_from_config_applies_threshold() {
        let mut config = DiffConfig::default();
        config.threshold = 100;
        let pipeline = DifferencePipeline::from_config(&config).expect("Should build pipeline");

        let before = GrayImage::from_pixel(20, 20, Luma([10]));
        let after = with_patch(&before, 5..10, 5..10, 60);
        let result = pipeline.compute(&before, &after).expect("Should compute difference");
        assert!(result.contours.is_empty());
    }
}
