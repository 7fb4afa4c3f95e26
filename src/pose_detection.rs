use crate::{
    config::{Config, InputType},
    constants::{KEYPOINT_VALUES, NUM_POSE_LANDMARKS},
    joints::REQUIRED_LANDMARKS,
    landmarks::LandmarkSet,
    provider::{LandmarkProvider, LandmarkProviderFactory},
    utils::{
        image_conversion::{nhwc_batch_f32, nhwc_batch_i32},
        safe_cast::unit_score,
    },
    Error, Result,
};
use ndarray::CowArray;
use opencv::core::Mat;
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Detection settings shared by every session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorSettings {
    /// Square model input resolution
    pub input_size: i32,
    /// Input tensor element type
    pub input_type: InputType,
    /// Minimum mean required-keypoint score
    pub min_detection_confidence: f32,
    /// Keypoints below this score are left out of the set
    pub min_keypoint_score: f32,
}

impl From<&Config> for DetectorSettings {
    fn from(config: &Config) -> Self {
        Self {
            input_size: config.model.input_size,
            input_type: config.model.input_type,
            min_detection_confidence: config.detection.min_detection_confidence,
            min_keypoint_score: config.detection.min_keypoint_score,
        }
    }
}

/// Single-person body keypoint detector using `ONNX` Runtime
///
/// Expects a MoveNet-style model: one NHWC RGB image in, a `[1, 1, 17, 3]`
/// tensor of normalized `(y, x, score)` keypoints out.
pub struct PoseDetector {
    session: Session,
    settings: DetectorSettings,
}

impl PoseDetector {
    /// Create a new pose detector from an `ONNX` model file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX runtime environment cannot be created
    /// - The ONNX model file cannot be loaded
    /// - The model has no inputs or outputs
    pub fn new<P: AsRef<Path>>(model_path: P, settings: DetectorSettings) -> Result<Self> {
        let environment = Arc::new(
            Environment::builder()
                .with_name("pose_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );
        Self::with_environment(&environment, model_path, settings)
    }

    /// Create a detector session inside an existing runtime environment
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or has no inputs or outputs
    pub fn with_environment<P: AsRef<Path>>(
        environment: &Arc<Environment>,
        model_path: P,
        settings: DetectorSettings,
    ) -> Result<Self> {
        log::debug!("Opening pose session for model: {}", model_path.as_ref().display());

        let session = ort::SessionBuilder::new(environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() {
            return Err(Error::ModelInputError("Model has no inputs".to_string()));
        }
        if session.outputs.is_empty() {
            return Err(Error::ModelOutputError("Model has no outputs".to_string()));
        }

        Ok(Self { session, settings })
    }

    /// Run the model and return raw `(x, y, score)` keypoints
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing, inference, or output extraction fails
    pub fn keypoints(&self, image: &Mat) -> Result<Vec<(f32, f32, f32)>> {
        let raw = self.forward(image)?;
        parse_keypoints(&raw)
    }

    fn forward(&self, image: &Mat) -> Result<Vec<f32>> {
        let size = self.settings.input_size;

        let outputs = match self.settings.input_type {
            InputType::Int32 => {
                let cow_array = CowArray::from(nhwc_batch_i32(image, size)?.into_dyn());
                let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
                self.session.run(vec![input_tensor])?
            }
            InputType::Float32 => {
                let cow_array = CowArray::from(nhwc_batch_f32(image, size)?.into_dyn());
                let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
                self.session.run(vec![input_tensor])?
            }
        };

        let keypoint_output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;

        let keypoint_tensor = keypoint_output.try_extract::<f32>()?;
        let keypoint_view = keypoint_tensor.view();
        let keypoint_data = keypoint_view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to get output data".to_string()))?;

        Ok(keypoint_data.to_vec())
    }
}

impl LandmarkProvider for PoseDetector {
    fn detect(&mut self, image: &Mat) -> Result<Option<LandmarkSet>> {
        if image.empty() {
            return Err(Error::InvalidInput("Empty frame".to_string()));
        }

        let keypoints = self.keypoints(image)?;
        let landmarks = select_person(&keypoints, &self.settings)?;

        match &landmarks {
            Some(set) => log::debug!("Person detected with {} landmarks", set.len()),
            None => log::debug!("No person above confidence {}", self.settings.min_detection_confidence),
        }

        Ok(landmarks)
    }
}

/// Convert the flat `(y, x, score)` model output into `(x, y, score)` tuples
///
/// # Errors
///
/// Returns an error if the output does not hold exactly 17 keypoints
pub fn parse_keypoints(raw: &[f32]) -> Result<Vec<(f32, f32, f32)>> {
    if raw.len() != NUM_POSE_LANDMARKS * KEYPOINT_VALUES {
        return Err(Error::ModelDataFormatError(format!(
            "Expected {} output values ({} keypoints x {}), got {}",
            NUM_POSE_LANDMARKS * KEYPOINT_VALUES,
            NUM_POSE_LANDMARKS,
            KEYPOINT_VALUES,
            raw.len()
        )));
    }

    Ok(raw
        .chunks_exact(KEYPOINT_VALUES)
        .map(|kp| (kp[1], kp[0], unit_score(kp[2])))
        .collect())
}

/// Apply the detection thresholds to raw keypoints
///
/// A person counts as detected when the mean score of the required keypoints
/// reaches `min_detection_confidence` and none of them falls below
/// `min_keypoint_score`; anything less is reported as no detection.
///
/// # Errors
///
/// Returns an error if the keypoint count is wrong
pub fn select_person(keypoints: &[(f32, f32, f32)], settings: &DetectorSettings) -> Result<Option<LandmarkSet>> {
    let all = LandmarkSet::from_keypoints(keypoints)?;

    let mut total = 0.0f32;
    for landmark in REQUIRED_LANDMARKS {
        let score = all.require(landmark)?.score;
        if score < settings.min_keypoint_score {
            return Ok(None);
        }
        total += score;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = total / REQUIRED_LANDMARKS.len() as f32;
    if mean < settings.min_detection_confidence {
        return Ok(None);
    }

    let mut set = LandmarkSet::new();
    for (landmark, point) in all.iter() {
        if point.score >= settings.min_keypoint_score {
            set.insert(landmark, *point);
        }
    }
    Ok(Some(set))
}

/// Factory opening one [`PoseDetector`] session per request
pub struct OnnxPoseDetectorFactory {
    environment: Arc<Environment>,
    model_path: PathBuf,
    settings: DetectorSettings,
}

impl OnnxPoseDetectorFactory {
    /// Create the shared runtime environment for `model_path`
    ///
    /// # Errors
    ///
    /// Returns an error if the ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P, settings: DetectorSettings) -> Result<Self> {
        log::info!(
            "Initializing pose detector factory with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("pose_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        Ok(Self {
            environment,
            model_path: model_path.as_ref().to_path_buf(),
            settings,
        })
    }

    /// Create a factory from the application configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the ONNX runtime environment cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.model.pose_landmarks, DetectorSettings::from(config))
    }

    /// Model file used for every session
    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl LandmarkProviderFactory for OnnxPoseDetectorFactory {
    type Provider = PoseDetector;

    fn acquire(&self) -> Result<Self::Provider> {
        PoseDetector::with_environment(&self.environment, &self.model_path, self.settings)
    }
}
