//! Body landmark identifiers and the per-detection landmark set.

use crate::constants::NUM_POSE_LANDMARKS;
use crate::utils::safe_cast::f64_to_i32;
use crate::{Error, Result};
use opencv::core::Point;
use std::fmt;

/// Anatomical keypoint identifier, in the model's output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoseLandmark {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl PoseLandmark {
    /// All identifiers in output order
    pub const ALL: [Self; NUM_POSE_LANDMARKS] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Position of this keypoint in the model output
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name, as used in logs and JSON keys
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for PoseLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A landmark position relative to the image size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedLandmark {
    /// Horizontal position as a fraction of image width
    pub x: f32,
    /// Vertical position as a fraction of image height
    pub y: f32,
    /// Model confidence for this keypoint
    pub score: f32,
}

impl NormalizedLandmark {
    /// Create a landmark with full confidence
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, score: 1.0 }
    }

    /// Create a landmark with an explicit confidence score
    #[must_use]
    pub const fn with_score(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }

    /// Convert to pixel coordinates, truncating toward zero
    ///
    /// # Errors
    ///
    /// Returns an error if the scaled coordinate does not fit in `i32`
    pub fn to_pixel(&self, width: i32, height: i32) -> Result<Point> {
        let x = f64_to_i32(f64::from(self.x) * f64::from(width))?;
        let y = f64_to_i32(f64::from(self.y) * f64::from(height))?;
        Ok(Point::new(x, y))
    }
}

/// Landmarks produced by one detection, indexed by [`PoseLandmark`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    points: [Option<NormalizedLandmark>; NUM_POSE_LANDMARKS],
}

impl LandmarkSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw model keypoints given as `(x, y, score)`
    ///
    /// # Errors
    ///
    /// Returns an error if the number of keypoints is not [`NUM_POSE_LANDMARKS`]
    pub fn from_keypoints(keypoints: &[(f32, f32, f32)]) -> Result<Self> {
        if keypoints.len() != NUM_POSE_LANDMARKS {
            return Err(Error::InvalidInput(format!(
                "Expected {} keypoints, got {}",
                NUM_POSE_LANDMARKS,
                keypoints.len()
            )));
        }

        let mut set = Self::new();
        for (landmark, &(x, y, score)) in PoseLandmark::ALL.iter().zip(keypoints) {
            set.insert(*landmark, NormalizedLandmark::with_score(x, y, score));
        }
        Ok(set)
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, landmark: PoseLandmark, point: NormalizedLandmark) -> Self {
        self.insert(landmark, point);
        self
    }

    /// Set or replace a landmark
    pub fn insert(&mut self, landmark: PoseLandmark, point: NormalizedLandmark) {
        self.points[landmark.index()] = Some(point);
    }

    /// Remove a landmark, returning it if present
    pub fn remove(&mut self, landmark: PoseLandmark) -> Option<NormalizedLandmark> {
        self.points[landmark.index()].take()
    }

    /// Look up a landmark
    #[must_use]
    pub fn get(&self, landmark: PoseLandmark) -> Option<&NormalizedLandmark> {
        self.points[landmark.index()].as_ref()
    }

    /// Look up a landmark that must be present
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if the landmark is absent
    pub fn require(&self, landmark: PoseLandmark) -> Result<&NormalizedLandmark> {
        self.get(landmark).ok_or(Error::MissingLandmark(landmark))
    }

    /// Number of landmarks present
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// True if no landmark is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present landmarks in output order
    pub fn iter(&self) -> impl Iterator<Item = (PoseLandmark, &NormalizedLandmark)> {
        PoseLandmark::ALL
            .iter()
            .zip(self.points.iter())
            .filter_map(|(landmark, point)| point.as_ref().map(|p| (*landmark, p)))
    }
}
