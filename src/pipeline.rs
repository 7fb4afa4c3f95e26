//! Single-frame pose angle pipeline.
//!
//! ```text
//! bytes ──▶ decode ──▶ provider ──▶ pixels ──▶ angles
//!                                     └──────▶ overlay ──▶ data URI
//! ```
//!
//! Each call acquires its own landmark provider from the factory and drops it
//! before returning, whatever the outcome.

use crate::annotation::render_overlay;
use crate::codec::{decode_image, encode_data_uri};
use crate::joints::{angles_from_pixels, landmark_pixels, AngleResult};
use crate::provider::{LandmarkProvider, LandmarkProviderFactory};
use crate::Result;
use opencv::core::Mat;
use opencv::prelude::*;
use serde::Serialize;

/// Angles and overlay for a frame with a detected person
pub struct Analysis {
    /// The eight joint angles
    pub angles: AngleResult,
    /// Annotated copy of the input frame
    pub annotated: Mat,
}

/// Success payload: annotated image data URI plus angles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseReport {
    /// `data:image/png;base64,...`
    pub annotated_image: String,
    /// The eight joint angles
    pub angles: AngleResult,
}

/// Result of processing one uploaded frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame decoded but contained no detectable person
    NoPerson,
    /// Landmarks found; angles and overlay computed
    Success(PoseReport),
}

impl PoseReport {
    /// Encode an analysis for transport
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Encode`] if the overlay cannot be encoded
    pub fn from_analysis(analysis: &Analysis) -> Result<Self> {
        Ok(Self {
            annotated_image: encode_data_uri(&analysis.annotated)?,
            angles: analysis.angles,
        })
    }
}

/// Detect, measure, and annotate a decoded frame
///
/// Returns `Ok(None)` when the provider finds no person.
///
/// # Errors
///
/// Returns an error if the provider cannot be acquired or fails, if a
/// required landmark is missing, or if drawing fails
pub fn analyze_image<F: LandmarkProviderFactory>(factory: &F, image: &Mat) -> Result<Option<Analysis>> {
    let detection = {
        let mut provider = factory.acquire()?;
        provider.detect(image)?
    };

    let Some(landmarks) = detection else {
        return Ok(None);
    };

    let pixels = landmark_pixels(&landmarks, image.cols(), image.rows())?;
    let angles = angles_from_pixels(&pixels)?;
    let annotated = render_overlay(image, &pixels)?;

    log::debug!("Measured angles: {:?}", angles.iter().collect::<Vec<_>>());

    Ok(Some(Analysis { angles, annotated }))
}

/// Run the full pipeline on uploaded image bytes
///
/// # Errors
///
/// Returns [`crate::Error::Decode`] for undecodable bytes,
/// [`crate::Error::Encode`] if the overlay cannot be encoded, and any
/// provider or extraction error from [`analyze_image`]
pub fn analyze_frame<F: LandmarkProviderFactory>(factory: &F, bytes: &[u8]) -> Result<FrameOutcome> {
    let image = decode_image(bytes)?;
    log::debug!("Decoded {}x{} frame from {} bytes", image.cols(), image.rows(), bytes.len());

    match analyze_image(factory, &image)? {
        None => Ok(FrameOutcome::NoPerson),
        Some(analysis) => Ok(FrameOutcome::Success(PoseReport::from_analysis(&analysis)?)),
    }
}
