use anyhow::Error;
use async_trait::async_trait;
use opencv::core::Mat;

use crate::utils::coordinate::LandmarkSet;

/// Seam for the external face-mesh detector.
///
/// Runs on the full-resolution image so the returned normalized
/// coordinates can be projected back onto it for rendering. `Ok(None)`
/// means "no face found" and short-circuits the pipeline into its
/// no-face outcome; it is not an error.
#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    async fn detect(&self, img: &Mat) -> Result<Option<LandmarkSet>, Error>;
}
