use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::algorithms::{DEFAULT_HIGHLIGHT_COLOR, DEFAULT_LINE_THICKNESS, DEFAULT_THRESHOLD, MAX_LINE_THICKNESS};
use crate::error::{DiffError, Result};
use crate::naming::DEFAULT_AFTER_SUFFIX;

/// Container format for result images.
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    #[serde(alias = "tiff")]
    #[strum(to_string = "tif", serialize = "tiff")]
    Tif,
    Png,
}

impl OutputFormat {
    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        self.into()
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Tif => ImageFormat::Tiff,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// Settings for a whole before/after batch.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct DiffConfig {
    /// Directory holding the before images
    pub before_dir: PathBuf,
    /// Directory holding the after images, named `<base_name><after_suffix>`
    pub after_dir: PathBuf,
    /// Directory receiving `<base_name>_result.<ext>` files
    pub results_dir: PathBuf,
    /// Differences strictly above this value count as changes
    pub threshold: u8,
    /// Contour colour as RGB
    pub highlight_color: [u8; 3],
    #[schemars(range(min = 1, max = 64))]
    pub line_thickness: u32,
    /// One result file is written per entry
    pub output_formats: Vec<OutputFormat>,
    pub after_suffix: String,
    /// Abort the batch on the first unreadable or mismatched pair instead of skipping it
    pub strict: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            before_dir: PathBuf::from("before"),
            after_dir: PathBuf::from("after"),
            results_dir: PathBuf::from("results"),
            threshold: DEFAULT_THRESHOLD,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR,
            line_thickness: DEFAULT_LINE_THICKNESS,
            output_formats: vec![OutputFormat::Tif, OutputFormat::Png],
            after_suffix: DEFAULT_AFTER_SUFFIX.to_string(),
            strict: false,
        }
    }
}

impl DiffConfig {
    /// Default configuration rooted at the given directories
    pub fn with_directories(
        before_dir: impl Into<PathBuf>,
        after_dir: impl Into<PathBuf>,
        results_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            before_dir: before_dir.into(),
            after_dir: after_dir.into(),
            results_dir: results_dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.line_thickness == 0 || self.line_thickness > MAX_LINE_THICKNESS {
            return Err(DiffError::InvalidConfig(format!(
                "line_thickness must be between 1 and {MAX_LINE_THICKNESS}"
            )));
        }
        if self.output_formats.is_empty() {
            return Err(DiffError::InvalidConfig("output_formats must not be empty".to_string()));
        }
        if self.after_suffix.is_empty() {
            return Err(DiffError::InvalidConfig("after_suffix must not be empty".to_string()));
        }
        Ok(())
    }

    /// Get the JSON schema for the configuration
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DiffConfig)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path_ref),
            Some("json") => Self::from_json_file(path_ref),
            _ => Err(DiffError::UnsupportedConfigFormat(path_ref.to_path_buf())),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save configuration in the format implied by the file extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(DiffError::UnsupportedConfigFormat(path_ref.to_path_buf())),
        };
        fs::write(path_ref, content)?;
        Ok(())
    }
}
