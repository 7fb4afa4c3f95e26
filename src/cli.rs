//! Command line interface definition.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Measure body joint angles on uploaded images
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP pose detection service
    Serve {
        /// Socket address to listen on
        #[arg(short, long)]
        bind: Option<String>,

        /// Pose landmark ONNX model
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Analyze a single image file and print the JSON response
    Analyze {
        /// Image to analyze
        #[arg(short, long)]
        image: PathBuf,

        /// Write the annotated overlay to this PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pose landmark ONNX model
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Write the default configuration to a YAML file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

impl Command {
    /// Apply command line overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        match self {
            Self::Serve { bind, model } => {
                if let Some(bind) = bind {
                    config.server.bind_address.clone_from(bind);
                }
                if let Some(model) = model {
                    config.model.pose_landmarks.clone_from(model);
                }
            }
            Self::Analyze { model: Some(model), .. } => {
                config.model.pose_landmarks.clone_from(model);
            }
            Self::Analyze { model: None, .. } | Self::InitConfig { .. } => {}
        }
    }
}
