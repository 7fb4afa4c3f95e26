//! Constants used throughout the application

/// Number of keypoints reported by the pose model (COCO layout)
pub const NUM_POSE_LANDMARKS: usize = 17;

/// Number of joint angles reported per frame
pub const NUM_JOINT_ANGLES: usize = 8;

/// Number of distinct landmarks referenced by the joint angle table
pub const NUM_REQUIRED_LANDMARKS: usize = 12;

/// Values per keypoint in the model output (y, x, score)
pub const KEYPOINT_VALUES: usize = 3;

/// Guard added to the norm product in the angle computation
pub const ANGLE_EPSILON: f64 = 1e-6;

/// Decimal places kept in reported angles
pub const ANGLE_DECIMALS: i32 = 2;

/// Joint marker radius in pixels
pub const MARKER_RADIUS: i32 = 8;

/// Limb segment thickness in pixels
pub const SEGMENT_THICKNESS: i32 = 2;

/// Default square input size of the pose model
pub const DEFAULT_MODEL_INPUT_SIZE: i32 = 192;

/// Default minimum mean keypoint score for a person to count as detected
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.5;

/// Default upload limit for the `frame` field (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field carrying the uploaded image
pub const FRAME_FIELD: &str = "frame";

/// Prefix of the annotated image data URI
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";
