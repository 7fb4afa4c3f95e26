//! Joint angle extraction from a detected landmark set.
//!
//! Eight angles are measured, each at the middle landmark of a fixed triple.
//! The triple table is static configuration; landmark positions are converted
//! to pixel space once and shared with the annotation renderer.

use crate::constants::{ANGLE_DECIMALS, NUM_JOINT_ANGLES, NUM_REQUIRED_LANDMARKS};
use crate::geometry::{angle_at_vertex, Point2D};
use crate::landmarks::{LandmarkSet, PoseLandmark};
use crate::{Error, Result};
use opencv::core::Point;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use PoseLandmark::{
    LeftAnkle, LeftElbow, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightAnkle, RightElbow, RightHip, RightKnee,
    RightShoulder, RightWrist,
};

/// One output angle and the landmarks it is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointAngleTriple {
    /// Output key
    pub name: &'static str,
    /// First ray endpoint
    pub point_a: PoseLandmark,
    /// Landmark at which the angle is measured
    pub vertex: PoseLandmark,
    /// Second ray endpoint
    pub point_c: PoseLandmark,
}

impl JointAngleTriple {
    const fn new(name: &'static str, point_a: PoseLandmark, vertex: PoseLandmark, point_c: PoseLandmark) -> Self {
        Self {
            name,
            point_a,
            vertex,
            point_c,
        }
    }
}

/// The eight measured joints, in output order
pub const JOINT_ANGLE_TRIPLES: [JointAngleTriple; NUM_JOINT_ANGLES] = [
    JointAngleTriple::new("right_elbow", RightShoulder, RightElbow, RightWrist),
    JointAngleTriple::new("left_elbow", LeftShoulder, LeftElbow, LeftWrist),
    JointAngleTriple::new("right_knee", RightHip, RightKnee, RightAnkle),
    JointAngleTriple::new("left_knee", LeftHip, LeftKnee, LeftAnkle),
    JointAngleTriple::new("right_shoulder", RightElbow, RightShoulder, RightHip),
    JointAngleTriple::new("left_shoulder", LeftElbow, LeftShoulder, LeftHip),
    JointAngleTriple::new("right_wrist", RightElbow, RightWrist, RightShoulder),
    JointAngleTriple::new("left_wrist", LeftElbow, LeftWrist, LeftShoulder),
];

/// Every landmark referenced by [`JOINT_ANGLE_TRIPLES`]
pub const REQUIRED_LANDMARKS: [PoseLandmark; NUM_REQUIRED_LANDMARKS] = [
    RightShoulder,
    RightElbow,
    RightWrist,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    RightHip,
    RightKnee,
    RightAnkle,
    LeftHip,
    LeftKnee,
    LeftAnkle,
];

/// Pixel positions of the required landmarks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkPixels {
    points: BTreeMap<PoseLandmark, Point>,
}

impl LandmarkPixels {
    /// Create an empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a pixel position
    pub fn insert(&mut self, landmark: PoseLandmark, point: Point) {
        self.points.insert(landmark, point);
    }

    /// Look up a pixel position
    #[must_use]
    pub fn get(&self, landmark: PoseLandmark) -> Option<Point> {
        self.points.get(&landmark).copied()
    }

    /// Look up a pixel position that must be present
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if the landmark is absent
    pub fn require(&self, landmark: PoseLandmark) -> Result<Point> {
        self.get(landmark).ok_or(Error::MissingLandmark(landmark))
    }

    /// Number of mapped landmarks
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if nothing is mapped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The eight joint angles of one frame, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleResult {
    values: [f64; NUM_JOINT_ANGLES],
}

impl AngleResult {
    /// Angle by output key
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        JOINT_ANGLE_TRIPLES
            .iter()
            .position(|triple| triple.name == name)
            .map(|i| self.values[i])
    }

    /// `(name, degrees)` pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        JOINT_ANGLE_TRIPLES
            .iter()
            .zip(self.values.iter())
            .map(|(triple, value)| (triple.name, *value))
    }
}

impl Serialize for AngleResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUM_JOINT_ANGLES))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Round to the reported precision
#[must_use]
pub fn round_angle(value: f64) -> f64 {
    let factor = 10f64.powi(ANGLE_DECIMALS);
    (value * factor).round() / factor
}

/// Convert the required landmarks to pixel coordinates
///
/// # Errors
///
/// Returns [`Error::MissingLandmark`] if a required landmark is absent, or
/// [`Error::InvalidInput`] if a coordinate cannot be represented in pixels
pub fn landmark_pixels(landmarks: &LandmarkSet, image_width: i32, image_height: i32) -> Result<LandmarkPixels> {
    let mut pixels = LandmarkPixels::new();
    for landmark in REQUIRED_LANDMARKS {
        let point = landmarks.require(landmark)?.to_pixel(image_width, image_height)?;
        pixels.insert(landmark, point);
    }
    Ok(pixels)
}

/// Measure every joint in [`JOINT_ANGLE_TRIPLES`] from pixel positions
///
/// # Errors
///
/// Returns [`Error::MissingLandmark`] if a referenced landmark is absent
pub fn angles_from_pixels(pixels: &LandmarkPixels) -> Result<AngleResult> {
    let mut values = [0.0; NUM_JOINT_ANGLES];
    for (value, triple) in values.iter_mut().zip(JOINT_ANGLE_TRIPLES.iter()) {
        let a = Point2D::from(pixels.require(triple.point_a)?);
        let b = Point2D::from(pixels.require(triple.vertex)?);
        let c = Point2D::from(pixels.require(triple.point_c)?);
        *value = round_angle(angle_at_vertex(a, b, c));
    }
    Ok(AngleResult { values })
}

/// Compute the eight joint angles for a landmark set detected on an image of
/// the given size
///
/// # Errors
///
/// Returns [`Error::MissingLandmark`] if any required landmark is absent
pub fn extract_angles(landmarks: &LandmarkSet, image_width: i32, image_height: i32) -> Result<AngleResult> {
    let pixels = landmark_pixels(landmarks, image_width, image_height)?;
    angles_from_pixels(&pixels)
}
