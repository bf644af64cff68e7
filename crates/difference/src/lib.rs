//! # Before/After Difference Library
//!
//! Compares paired grayscale "before" and "after" images, outlines the regions
//! that changed and saves the before image annotated with those outlines.
//!
//! ## Core Features
//!
//! - **Trait-based Stages**: difference, preprocessing, contour extraction and rendering are swappable
//! - **External Contours**: only the outer boundary of each changed region is reported
//! - **Batch Driver**: matches `before/<name>.*` with `after/<name>_w.tif` and reports each pair's outcome
//! - **File Config**: TOML or JSON configuration with defaults for every field
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use difference::{DiffConfig, process_images};
//!
//! // Compare before/ against after/ and write into results/
//! let report = process_images(&DiffConfig::default())?;
//! println!("{} pairs processed", report.processed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Single Pair
//!
//! ```rust,no_run
//! use difference::{DifferencePipeline, io::load_grayscale};
//!
//! let pipeline = DifferencePipeline::builder()
//!     .with_threshold(30)
//!     .with_overlay([200, 200, 0], 2)
//!     .build();
//!
//! let before = load_grayscale("before/scan.tif")?;
//! let after = load_grayscale("after/scan_w.tif")?;
//! let result = pipeline.compute_and_save(&before, &after, "results/scan")?;
//! println!("{} changed regions", result.contours.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;
pub mod naming;
pub mod config;
pub mod driver;

// Re-exports for convenience
pub use error::{DiffError, Result};
pub use types::{ComputedDifference, Contour};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{DifferencePipeline, builder::PipelineBuilder};
pub use config::{DiffConfig, OutputFormat};
pub use driver::{BatchReport, PairOutcome, process_directories, process_images};

use image::GrayImage;
use std::path::Path;

/// Compare a pair with the default settings and write `<output_prefix>_result.tif`
/// and `<output_prefix>_result.png`.
pub fn compute_and_save<P: AsRef<Path>>(
    before: &GrayImage,
    after: &GrayImage,
    output_prefix: P,
) -> Result<ComputedDifference> {
    DifferencePipeline::default().compute_and_save(before, after, output_prefix)
}
