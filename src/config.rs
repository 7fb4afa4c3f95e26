//! Configuration management for the pose angle service

use crate::constants::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MIN_DETECTION_CONFIDENCE, DEFAULT_MODEL_INPUT_SIZE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Pose model configuration
    pub model: ModelConfig,

    /// Detection thresholds
    pub detection: DetectionConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_address: String,

    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,

    /// Path of the pose detection endpoint
    pub route: String,
}

/// Element type of the model input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// 32-bit integer pixels in `[0, 255]`
    Int32,
    /// 32-bit float pixels in `[0, 255]`
    Float32,
}

/// Pose model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the single-person pose landmark ONNX model
    pub pose_landmarks: PathBuf,

    /// Square input resolution expected by the model
    pub input_size: i32,

    /// Input tensor element type
    pub input_type: InputType,
}

/// Detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum mean score over the required keypoints (0.0-1.0)
    pub min_detection_confidence: f32,

    /// Keypoints scoring below this are dropped from the landmark set (0.0-1.0)
    pub min_keypoint_score: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            route: "/pose-detect/".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pose_landmarks: PathBuf::from("assets/pose_landmarks.onnx"),
            input_size: DEFAULT_MODEL_INPUT_SIZE,
            input_type: InputType::Int32,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_keypoint_score: 0.0,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate everything except the model path
    pub fn validate_settings(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection.min_detection_confidence) {
            return Err(Error::ConfigError(
                "Minimum detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detection.min_keypoint_score) {
            return Err(Error::ConfigError(
                "Minimum keypoint score must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.model.input_size <= 0 {
            return Err(Error::ConfigError("Model input size must be greater than 0".to_string()));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(Error::ConfigError("Maximum upload size must be greater than 0".to_string()));
        }
        if !self.server.route.starts_with('/') {
            return Err(Error::ConfigError(format!(
                "Route must start with '/': {}",
                self.server.route
            )));
        }
        if self.server.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(Error::ConfigError(format!(
                "Invalid bind address: {}",
                self.server.bind_address
            )));
        }

        Ok(())
    }

    /// Validate configuration, including that the model file exists
    pub fn validate(&self) -> Result<()> {
        self.validate_settings()?;

        if !self.model.pose_landmarks.exists() {
            return Err(Error::ConfigError(format!(
                "Pose landmark model not found: {}",
                self.model.pose_landmarks.display()
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Pose Angle Service Configuration

# HTTP server
server:
  bind_address: "127.0.0.1:8000"
  max_upload_bytes: 10485760
  route: "/pose-detect/"

# Pose landmark model
model:
  pose_landmarks: "assets/pose_landmarks.onnx"
  input_size: 192
  input_type: "int32"

# Detection thresholds
detection:
  min_detection_confidence: 0.5
  min_keypoint_score: 0.0
"#;
