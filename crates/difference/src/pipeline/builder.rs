use crate::{
    algorithms::{AbsoluteDifference, ContourOverlay, ExternalContourExtractor, ThresholdPreprocessor},
    config::{DiffConfig, OutputFormat},
    pipeline::DifferencePipeline,
    traits::{ContourExtractor, ContourRenderer, DifferenceOperator, ImagePreprocessor},
};

/// Builder for creating difference pipelines with a fluent API
pub struct PipelineBuilder {
    difference: Option<Box<dyn DifferenceOperator>>,
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    renderer: Option<Box<dyn ContourRenderer>>,
    output_formats: Option<Vec<OutputFormat>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            difference: None,
            preprocessors: Vec::new(),
            contour_extractor: None,
            renderer: None,
            output_formats: None,
        }
    }

    /// Builder preloaded with the threshold, overlay and formats from `config`
    pub fn from_config(config: &DiffConfig) -> Self {
        Self::new()
            .with_threshold(config.threshold)
            .with_overlay(config.highlight_color, config.line_thickness)
            .with_output_formats(config.output_formats.clone())
    }

    /// Set the difference operator (replaces any existing one)
    pub fn set_difference_operator<D>(mut self, operator: D) -> Self
    where
        D: DifferenceOperator + 'static,
    {
        self.difference = Some(Box::new(operator));
        self
    }

    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the contour renderer (replaces any existing one)
    pub fn set_renderer<R>(mut self, renderer: R) -> Self
    where
        R: ContourRenderer + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Add binary thresholding as a preprocessing step
    pub fn with_threshold(self, threshold: u8) -> Self {
        self.add_preprocessor(ThresholdPreprocessor { threshold })
    }

    /// Draw contours with the given RGB colour and line thickness
    pub fn with_overlay(self, color: [u8; 3], thickness: u32) -> Self {
        self.set_renderer(ContourOverlay::new(color, thickness))
    }

    pub fn with_output_formats(mut self, formats: Vec<OutputFormat>) -> Self {
        self.output_formats = Some(formats);
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> DifferencePipeline {
        let difference = self.difference
            .unwrap_or_else(|| Box::new(AbsoluteDifference));

        let mut preprocessors = self.preprocessors;
        if preprocessors.is_empty() {
            preprocessors.push(Box::new(ThresholdPreprocessor::default()));
        }

        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ExternalContourExtractor));

        let renderer = self.renderer
            .unwrap_or_else(|| Box::new(ContourOverlay::default()));

        let output_formats = self.output_formats
            .unwrap_or_else(|| vec![OutputFormat::Tif, OutputFormat::Png]);

        DifferencePipeline::new(
            difference,
            preprocessors,
            contour_extractor,
            renderer,
            output_formats,
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
