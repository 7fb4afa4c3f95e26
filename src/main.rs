//! Pose angle service: HTTP endpoint and one-shot image analysis.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use pose_angles::cli::{Cli, Command};
use pose_angles::codec::{decode_image, encode_png};
use pose_angles::config::{Config, EXAMPLE_CONFIG};
use pose_angles::pipeline::{analyze_image, PoseReport};
use pose_angles::pose_detection::OnnxPoseDetectorFactory;
use pose_angles::server::{self, ErrorBody, MSG_NO_PERSON};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger
    if cli.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if let Command::InitConfig { path } = &cli.command {
        std::fs::write(path, EXAMPLE_CONFIG).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    // Load configuration if provided
    let mut config = if let Some(config_path) = &cli.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    cli.command.apply_overrides(&mut config);
    config.validate()?;

    let factory = OnnxPoseDetectorFactory::from_config(&config)?;

    match cli.command {
        Command::Serve { .. } => server::serve(&config.server, factory).await?,
        Command::Analyze { image, output, .. } => analyze(&factory, &image, output.as_deref())?,
        Command::InitConfig { .. } => {}
    }

    Ok(())
}

fn analyze(factory: &OnnxPoseDetectorFactory, image_path: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = std::fs::read(image_path).with_context(|| format!("Failed to read {}", image_path.display()))?;
    let image = decode_image(&bytes)?;

    let Some(analysis) = analyze_image(factory, &image)? else {
        println!("{}", serde_json::to_string_pretty(&ErrorBody { error: MSG_NO_PERSON })?);
        return Ok(());
    };

    println!("{}", serde_json::to_string_pretty(&PoseReport::from_analysis(&analysis)?)?);

    if let Some(output) = output {
        std::fs::write(output, encode_png(&analysis.annotated)?)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Wrote annotated image to {}", output.display());
    }

    Ok(())
}
