use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    config::DiffConfig,
    error::{DiffError, Result},
    io::{ensure_directory_exists, list_files_in_directory, load_grayscale},
    naming,
    pipeline::DifferencePipeline,
};

/// What happened to a single before file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PairOutcome {
    Success {
        before: String,
        outputs: Vec<PathBuf>,
        contour_count: usize,
    },
    NoMatch {
        before: String,
    },
    DecodeError {
        before: String,
        path: PathBuf,
        message: String,
    },
    ShapeMismatch {
        before: String,
        before_dims: (u32, u32),
        after_dims: (u32, u32),
    },
    WriteError {
        before: String,
        path: Option<PathBuf>,
        message: String,
    },
}

impl PairOutcome {
    /// Classify an error raised while handling `before`
    pub fn from_error(before: &str, err: &DiffError) -> Self {
        let before = before.to_string();
        match err {
            DiffError::ImageLoad { path, source } => Self::DecodeError {
                before,
                path: path.clone(),
                message: source.to_string(),
            },
            DiffError::ShapeMismatch { before: before_dims, after: after_dims } => Self::ShapeMismatch {
                before,
                before_dims: *before_dims,
                after_dims: *after_dims,
            },
            DiffError::ImageSave { path, source } => Self::WriteError {
                before,
                path: Some(path.clone()),
                message: source.to_string(),
            },
            other => Self::WriteError {
                before,
                path: None,
                message: other.to_string(),
            },
        }
    }

    pub fn before(&self) -> &str {
        match self {
            Self::Success { before, .. }
            | Self::NoMatch { before }
            | Self::DecodeError { before, .. }
            | Self::ShapeMismatch { before, .. }
            | Self::WriteError { before, .. } => before,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Failures that stop the batch even in lenient mode
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::WriteError { .. })
    }
}

impl fmt::Display for PairOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { before, outputs, contour_count } => write!(
                f,
                "{before}: {contour_count} changed regions, {} result files",
                outputs.len()
            ),
            Self::NoMatch { before } => write!(f, "No relevant after-state image for {before} picture"),
            Self::DecodeError { before, path, message } => {
                write!(f, "Skipping {before}: cannot decode {}: {message}", path.display())
            }
            Self::ShapeMismatch { before, before_dims, after_dims } => write!(
                f,
                "Skipping {before}: before is {}x{} but after is {}x{}",
                before_dims.0, before_dims.1, after_dims.0, after_dims.1
            ),
            Self::WriteError { before, path: Some(path), message } => {
                write!(f, "Failed to write {} for {before}: {message}", path.display())
            }
            Self::WriteError { before, path: None, message } => {
                write!(f, "Failed to write results for {before}: {message}")
            }
        }
    }
}

/// Outcome of every before file in the order they were processed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<PairOutcome>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PairOutcome::NoMatch { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.processed() - self.skipped()
    }

    pub fn outcome_for(&self, before: &str) -> Option<&PairOutcome> {
        self.outcomes.iter().find(|o| o.before() == before)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Compare every before image in `config.before_dir` with its after image and
/// write annotated results into `config.results_dir`.
///
/// Missing after images are reported and skipped. Unreadable or mismatched
/// pairs are skipped too unless `config.strict` is set. Listing or write
/// failures end the batch; results written up to that point are kept.
pub fn process_images(config: &DiffConfig) -> Result<BatchReport> {
    let pipeline = DifferencePipeline::from_config(config)?;

    ensure_directory_exists(&config.results_dir)?;
    let before_files = list_files_in_directory(&config.before_dir)?;
    info!(
        "Comparing {} before images from {} against {}",
        before_files.len(),
        config.before_dir.display(),
        config.after_dir.display()
    );

    let mut report = BatchReport::default();
    for before in &before_files {
        let outcome = match process_pair(&pipeline, config, before) {
            Ok(outcome) => outcome,
            Err(err) => {
                let outcome = PairOutcome::from_error(before, &err);
                if outcome.is_fatal() || config.strict {
                    error!("{}", outcome);
                    return Err(err);
                }
                warn!("{}", outcome);
                outcome
            }
        };
        report.outcomes.push(outcome);
    }

    info!(
        "Done: {} processed, {} without after image, {} failed",
        report.processed(),
        report.skipped(),
        report.failed()
    );
    Ok(report)
}

/// [`process_images`] over explicit directories with every other setting at its default
pub fn process_directories<B, A, R>(before_dir: B, after_dir: A, results_dir: R) -> Result<BatchReport>
where
    B: Into<PathBuf>,
    A: Into<PathBuf>,
    R: Into<PathBuf>,
{
    process_images(&DiffConfig::with_directories(before_dir, after_dir, results_dir))
}

fn process_pair(pipeline: &DifferencePipeline, config: &DiffConfig, before: &str) -> Result<PairOutcome> {
    let after_path = naming::after_image_path(&config.after_dir, before, &config.after_suffix);
    if !after_path.is_file() {
        let outcome = PairOutcome::NoMatch { before: before.to_string() };
        warn!("{}", outcome);
        return Ok(outcome);
    }

    let before_image = load_grayscale(config.before_dir.join(before))?;
    let after_image = load_grayscale(&after_path)?;

    let computed = pipeline.compute(&before_image, &after_image)?;
    let prefix = naming::result_prefix(&config.results_dir, before);
    let outputs = computed.save(&prefix, pipeline.output_formats())?;

    Ok(PairOutcome::Success {
        before: before.to_string(),
        outputs,
        contour_count: computed.contours.len(),
    })
}
