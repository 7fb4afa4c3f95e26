//! Landmark provider seam.
//!
//! A provider turns one frame into a [`LandmarkSet`], or reports that no
//! person was found. Providers are acquired from a factory at the start of a
//! request and dropped when the request finishes, so no detector state is
//! shared between requests.

use crate::landmarks::LandmarkSet;
use crate::Result;
use opencv::core::Mat;

/// Single-frame body landmark detector
pub trait LandmarkProvider {
    /// Detect landmarks on a BGR frame
    ///
    /// Returns `Ok(None)` when no person is detected. A returned set carries
    /// every landmark the provider supports; partial detections are reported
    /// as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if inference itself fails
    fn detect(&mut self, image: &Mat) -> Result<Option<LandmarkSet>>;
}

/// Creates one [`LandmarkProvider`] per request
pub trait LandmarkProviderFactory: Send + Sync + 'static {
    /// Provider produced by this factory
    type Provider: LandmarkProvider;

    /// Acquire a fresh provider, released when dropped
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created (e.g. the model
    /// fails to load)
    fn acquire(&self) -> Result<Self::Provider>;
}

/// Provider returning a fixed detection, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    landmarks: Option<LandmarkSet>,
}

impl StaticProvider {
    /// Provider that always reports `landmarks`
    #[must_use]
    pub fn new(landmarks: Option<LandmarkSet>) -> Self {
        Self { landmarks }
    }
}

impl LandmarkProvider for StaticProvider {
    fn detect(&mut self, _image: &Mat) -> Result<Option<LandmarkSet>> {
        Ok(self.landmarks.clone())
    }
}

impl LandmarkProviderFactory for StaticProvider {
    type Provider = Self;

    fn acquire(&self) -> Result<Self::Provider> {
        Ok(self.clone())
    }
}
