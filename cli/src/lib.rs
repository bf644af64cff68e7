use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use difference::{DiffConfig, OutputFormat, Result};

#[derive(Parser, Debug)]
#[command(author, version, about = "Highlight what changed between before and after images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare every before image with its after image and write annotated results
    Run(RunArgs),
    /// Compare a single pair of images
    Compare {
        /// Path to the before image
        #[arg(short, long)]
        before: PathBuf,
        /// Path to the after image
        #[arg(short, long)]
        after: PathBuf,
        /// Output prefix, results are written as <prefix>_result.<ext>
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        overrides: PipelineOverrides,
    },
    /// Write the default configuration to a .toml or .json file
    InitConfig {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to a TOML or JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding the before images
    #[arg(long)]
    pub before: Option<PathBuf>,
    /// Directory holding the after images
    #[arg(long)]
    pub after: Option<PathBuf>,
    /// Directory receiving the result images
    #[arg(long)]
    pub results: Option<PathBuf>,
    /// Abort on the first unreadable or mismatched pair
    #[arg(long)]
    pub strict: bool,
    /// Write a JSON report of every pair's outcome
    #[arg(long)]
    pub report: Option<PathBuf>,
    #[command(flatten)]
    pub overrides: PipelineOverrides,
}

impl RunArgs {
    /// Configuration file (or defaults) with command line flags applied on top
    pub fn resolve_config(&self) -> Result<DiffConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(before) = &self.before {
            config.before_dir = before.clone();
        }
        if let Some(after) = &self.after {
            config.after_dir = after.clone();
        }
        if let Some(results) = &self.results {
            config.results_dir = results.clone();
        }
        if self.strict {
            config.strict = true;
        }
        self.overrides.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Default)]
pub struct PipelineOverrides {
    /// Differences strictly above this value count as changes
    #[arg(short, long)]
    pub threshold: Option<u8>,
    /// Contour line thickness in pixels
    #[arg(long)]
    pub thickness: Option<u32>,
    /// Contour colour as R,G,B
    #[arg(long, value_parser = parse_color)]
    pub color: Option<[u8; 3]>,
    /// Result formats to write (tif, png); repeat or separate with commas
    #[arg(long = "format", value_delimiter = ',', value_parser = parse_format)]
    pub formats: Vec<OutputFormat>,
}

impl PipelineOverrides {
    pub fn apply(&self, config: &mut DiffConfig) {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(thickness) = self.thickness {
            config.line_thickness = thickness;
        }
        if let Some(color) = self.color {
            config.highlight_color = color;
        }
        if !self.formats.is_empty() {
            config.output_formats = self.formats.clone();
        }
    }
}

/// Load a configuration file, or the defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<DiffConfig> {
    match path {
        Some(path) => DiffConfig::from_file(path),
        None => Ok(DiffConfig::default()),
    }
}

fn parse_format(value: &str) -> std::result::Result<OutputFormat, String> {
    OutputFormat::from_str(value).map_err(|_| format!("unsupported format '{value}', expected tif or png"))
}

fn parse_color(value: &str) -> std::result::Result<[u8; 3], String> {
    let channels: Vec<u8> = value
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid colour '{value}': {e}"))?;

    channels
        .try_into()
        .map_err(|_| format!("invalid colour '{value}': expected three values R,G,B"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_without_flags_uses_defaults() {
        let cli = Cli::try_parse_from(["show_difference", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("Expected run command");
        };

        assert_eq!(args.resolve_config().unwrap(), DiffConfig::default());
    }

    #[test]
    fn test_run_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("diff.toml");
        std::fs::write(&config_path, "before_dir = \"from_file\"\nthreshold = 12\n").unwrap();

        let cli = Cli::try_parse_from([
            "show_difference",
            "run",
            "--config",
            config_path.to_str().unwrap(),
            "--results",
            "out",
            "--threshold",
            "40",
            "--format",
            "png",
            "--color",
            "255,0,0",
            "--strict",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("Expected run command");
        };

        let config = args.resolve_config().unwrap();
        assert_eq!(config.before_dir, PathBuf::from("from_file"));
        assert_eq!(config.results_dir, PathBuf::from("out"));
        assert_eq!(config.threshold, 40);
        assert_eq!(config.output_formats, vec![OutputFormat::Png]);
        assert_eq!(config.highlight_color, [255, 0, 0]);
        assert!(config.strict);
    }

    #[test]
    fn test_zero_thickness_is_rejected() {
        let args = RunArgs {
            overrides: PipelineOverrides {
                thickness: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_oversized_thickness_is_rejected() {
        let args = RunArgs {
            overrides: PipelineOverrides {
                thickness: Some(1000),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_compare_arguments() {
        let cli = Cli::try_parse_from([
            "show_difference",
            "compare",
            "--before",
            "a.png",
            "--after",
            "b.tif",
            "--output",
            "results/a",
            "--format",
            "tif,png",
        ])
        .unwrap();

        match cli.command {
            Commands::Compare { before, after, output, overrides } => {
                assert_eq!(before, PathBuf::from("a.png"));
                assert_eq!(after, PathBuf::from("b.tif"));
                assert_eq!(output, PathBuf::from("results/a"));
                assert_eq!(overrides.formats, vec![OutputFormat::Tif, OutputFormat::Png]);
            }
            other => panic!("Expected compare command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("200, 200, 0").unwrap(), [200, 200, 0]);
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("1,2,300").is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["show_difference", "run", "--format", "bmp"]);
        assert!(result.is_err());
    }
}
