//! Draws joint markers and limb segments over a copy of the input frame.

use crate::constants::{MARKER_RADIUS, SEGMENT_THICKNESS};
use crate::joints::LandmarkPixels;
use crate::landmarks::PoseLandmark;
use crate::Result;
use opencv::core::{Mat, Scalar};
use opencv::imgproc::{self, LINE_8};
use opencv::prelude::*;

use PoseLandmark::{
    LeftAnkle, LeftElbow, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightAnkle, RightElbow, RightHip, RightKnee,
    RightShoulder, RightWrist,
};

/// Colour in OpenCV channel order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bgr(pub u8, pub u8, pub u8);

impl Bgr {
    /// Elbows and arm segments
    pub const RED: Self = Self(0, 0, 255);
    /// Knees and leg segments
    pub const GREEN: Self = Self(0, 255, 0);
    /// Shoulders and shoulder girdle segments
    pub const YELLOW: Self = Self(0, 255, 255);
    /// Wrists and forearm triangle segments
    pub const BLUE: Self = Self(255, 0, 0);

    fn scalar(self) -> Scalar {
        Scalar::new(f64::from(self.0), f64::from(self.1), f64::from(self.2), 0.0)
    }
}

/// Joint markers, drawn first and in this order
pub const MARKERS: [(PoseLandmark, Bgr); 8] = [
    (RightElbow, Bgr::RED),
    (LeftElbow, Bgr::RED),
    (RightKnee, Bgr::GREEN),
    (LeftKnee, Bgr::GREEN),
    (RightShoulder, Bgr::YELLOW),
    (LeftShoulder, Bgr::YELLOW),
    (RightWrist, Bgr::BLUE),
    (LeftWrist, Bgr::BLUE),
];

/// Limb segments, drawn over the markers in this order
pub const SEGMENTS: [(PoseLandmark, PoseLandmark, Bgr); 16] = [
    // arm
    (RightShoulder, RightElbow, Bgr::RED),
    (RightElbow, RightWrist, Bgr::RED),
    (LeftShoulder, LeftElbow, Bgr::RED),
    (LeftElbow, LeftWrist, Bgr::RED),
    // leg
    (RightHip, RightKnee, Bgr::GREEN),
    (RightKnee, RightAnkle, Bgr::GREEN),
    (LeftHip, LeftKnee, Bgr::GREEN),
    (LeftKnee, LeftAnkle, Bgr::GREEN),
    // shoulder girdle
    (RightElbow, RightShoulder, Bgr::YELLOW),
    (RightShoulder, RightHip, Bgr::YELLOW),
    (LeftElbow, LeftShoulder, Bgr::YELLOW),
    (LeftShoulder, LeftHip, Bgr::YELLOW),
    // forearm triangle
    (RightElbow, RightWrist, Bgr::BLUE),
    (RightWrist, RightShoulder, Bgr::BLUE),
    (LeftElbow, LeftWrist, Bgr::BLUE),
    (LeftWrist, LeftShoulder, Bgr::BLUE),
];

/// Render markers and segments onto a deep copy of `image`
///
/// # Errors
///
/// Returns an error if:
/// - A landmark referenced by the drawing tables is missing from `pixels`
/// - An OpenCV drawing call fails
pub fn render_overlay(image: &Mat, pixels: &LandmarkPixels) -> Result<Mat> {
    let mut annotated = image.try_clone()?;

    for (landmark, color) in MARKERS {
        imgproc::circle(
            &mut annotated,
            pixels.require(landmark)?,
            MARKER_RADIUS,
            color.scalar(),
            imgproc::FILLED,
            LINE_8,
            0,
        )?;
    }

    for (from, to, color) in SEGMENTS {
        imgproc::line(
            &mut annotated,
            pixels.require(from)?,
            pixels.require(to)?,
            color.scalar(),
            SEGMENT_THICKNESS,
            LINE_8,
            0,
        )?;
    }

    log::debug!(
        "Rendered {} markers and {} segments on {}x{} frame",
        MARKERS.len(),
        SEGMENTS.len(),
        annotated.cols(),
        annotated.rows()
    );

    Ok(annotated)
}
