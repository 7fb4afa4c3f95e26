//! Utility functions for image conversion and checked numeric casts.

pub mod image_conversion;
pub mod safe_cast;
