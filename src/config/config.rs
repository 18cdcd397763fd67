use serde::{Deserialize, Serialize};

/// Tuning knobs for one pipeline instance.
///
/// `pixel_scale` matches the classifier training normalization and
/// `encode_ext` selects the output compression of the annotated image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub pixel_scale: f32,
    pub encode_ext: String,
}

impl PipelineConfig {
    pub fn new() -> Self {
        PipelineConfig {
            pixel_scale: 1.0 / 255.0,
            encode_ext: ".jpg".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
