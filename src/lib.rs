//! Single-frame human pose joint angle library.
//!
//! This library measures eight body joint angles from one image using:
//! - ONNX Runtime for body landmark inference
//! - `OpenCV` for decoding, drawing, and PNG encoding
//! - `axum` for the HTTP upload endpoint
//!
//! The pipeline consists of:
//! 1. Decoding the uploaded bytes into a BGR frame
//! 2. Detecting the 17 body landmarks with a per-request provider
//! 3. Converting landmarks to pixels and measuring the vertex angles
//! 4. Drawing markers and segments on a copy of the frame
//! 5. Returning the angles together with the overlay as a PNG data URI
//!
//! # Examples
//!
//! ## Measuring angles from known landmarks
//!
//! ```
//! use pose_angles::joints::extract_angles;
//! use pose_angles::landmarks::{LandmarkSet, NormalizedLandmark, PoseLandmark};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let set = LandmarkSet::new()
//!     .with(PoseLandmark::LeftShoulder, NormalizedLandmark::new(0.6, 0.3))
//!     .with(PoseLandmark::RightShoulder, NormalizedLandmark::new(0.4, 0.3))
//!     .with(PoseLandmark::LeftElbow, NormalizedLandmark::new(0.6, 0.5))
//!     .with(PoseLandmark::RightElbow, NormalizedLandmark::new(0.4, 0.5))
//!     .with(PoseLandmark::LeftWrist, NormalizedLandmark::new(0.8, 0.5))
//!     .with(PoseLandmark::RightWrist, NormalizedLandmark::new(0.2, 0.5))
//!     .with(PoseLandmark::LeftHip, NormalizedLandmark::new(0.55, 0.6))
//!     .with(PoseLandmark::RightHip, NormalizedLandmark::new(0.45, 0.6))
//!     .with(PoseLandmark::LeftKnee, NormalizedLandmark::new(0.55, 0.8))
//!     .with(PoseLandmark::RightKnee, NormalizedLandmark::new(0.45, 0.8))
//!     .with(PoseLandmark::LeftAnkle, NormalizedLandmark::new(0.55, 1.0))
//!     .with(PoseLandmark::RightAnkle, NormalizedLandmark::new(0.45, 1.0));
//!
//! let angles = extract_angles(&set, 100, 100)?;
//! assert_eq!(angles.get("right_elbow"), Some(90.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the pipeline on an upload
//!
//! ```no_run
//! use pose_angles::config::Config;
//! use pose_angles::pipeline::{analyze_frame, FrameOutcome};
//! use pose_angles::pose_detection::OnnxPoseDetectorFactory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let factory = OnnxPoseDetectorFactory::from_config(&Config::default())?;
//! let bytes = std::fs::read("person.jpg")?;
//!
//! match analyze_frame(&factory, &bytes)? {
//!     FrameOutcome::Success(report) => println!("{}", serde_json::to_string(&report)?),
//!     FrameOutcome::NoPerson => println!("No person detected"),
//! }
//! # Ok(())
//! # }
//! ```

/// Vertex angle computation on 2D points
pub mod geometry;

/// Body landmark identifiers and normalized landmark sets
pub mod landmarks;

/// Joint angle table and angle extraction
pub mod joints;

/// Annotation overlay rendering
pub mod annotation;

/// Image decoding and PNG/data URI encoding
pub mod codec;

/// Landmark provider traits and a fixed in-memory provider
pub mod provider;

/// ONNX-backed body landmark detection
pub mod pose_detection;

/// Single-frame analysis pipeline
pub mod pipeline;

/// HTTP request handling
pub mod server;

/// Command line interface
pub mod cli;

/// Utility functions for image conversion and checked casts
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
