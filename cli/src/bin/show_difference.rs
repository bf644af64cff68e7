use clap::Parser;
use cli::{Cli, Commands, PipelineOverrides, RunArgs};
use color_eyre::eyre::Result;
use difference::{DiffConfig, DifferencePipeline, io::load_grayscale, process_images};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run(args) => {
            run_batch(args)?;
        }
        Commands::Compare { before, after, output, overrides } => {
            compare_pair(before, after, output, overrides)?;
        }
        Commands::InitConfig { output } => {
            DiffConfig::default().to_file(output)?;
            info!("Default configuration written to {:?}", output);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&DiffConfig::schema())?);
        }
    }

    Ok(())
}

fn run_batch(args: &RunArgs) -> Result<()> {
    let config = args.resolve_config()?;
    info!("Configuration: {:?}", config);

    let report = match process_images(&config) {
        Ok(report) => report,
        Err(e) => {
            error!("Batch aborted: {}", e);
            return Err(e.into());
        }
    };

    if let Some(report_path) = &args.report {
        report.to_json_file(report_path)?;
        info!("Report saved to {:?}", report_path);
    }

    info!(
        "✅ {} pairs processed, {} without after image, {} failed",
        report.processed(),
        report.skipped(),
        report.failed()
    );
    Ok(())
}

fn compare_pair(before: &Path, after: &Path, output: &Path, overrides: &PipelineOverrides) -> Result<()> {
    let mut config = DiffConfig::default();
    overrides.apply(&mut config);
    let pipeline = DifferencePipeline::from_config(&config)?;

    let before_image = load_grayscale(before)?;
    let after_image = load_grayscale(after)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        difference::io::ensure_directory_exists(parent)?;
    }

    let result = pipeline.compute_and_save(&before_image, &after_image, output)?;
    info!(
        "✅ {} changed regions ({} pixels) between {:?} and {:?}",
        result.contours.len(),
        result.changed_pixels(),
        before,
        after
    );
    Ok(())
}
