use opencv::core::MatTraitConst;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::config::PipelineConfig;
use crate::error::Result;
use crate::geometry::geometry::build_polygon;
use crate::mapping::mapping::MappingStore;
use crate::modules::classifier_client::ExpressionClassifier;
use crate::modules::landmark_detector::LandmarkDetector;
use crate::modules::model_registry::ModelRegistry;
use crate::render::render::render_overlay;
use crate::resolver::resolver::resolve;
use crate::utils::image::{decode_image, encode_image, to_input_tensor};
use crate::utils::utils::argmax;

/// Record handed to the transport layer for a recognized face.
/// `muscle_names` and `muscle_colors` have the same length and order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub recognized_label: String,
    pub muscle_names: Vec<String>,
    pub muscle_colors: Vec<String>,
    pub annotated_image: Vec<u8>,
}

/// Terminal outcome of one request. `NoFace` is a normal result with
/// empty label/muscle fields, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineOutcome {
    Recognized(RecognitionResult),
    NoFace,
}

#[derive(Debug)]
pub struct ExpressionPipeline<D, C> {
    detector: D,
    registry: ModelRegistry<C>,
    mapping: MappingStore,
    config: PipelineConfig,
}

impl<D, C> ExpressionPipeline<D, C>
where
    D: LandmarkDetector,
    C: ExpressionClassifier,
{
    /// new initializes new instance of the pipeline.
    pub fn new(
        detector: D,
        registry: ModelRegistry<C>,
        mapping: MappingStore,
        config: PipelineConfig,
    ) -> Self {
        ExpressionPipeline { detector, registry, mapping, config }
    }

    /// process runs one request end to end:
    /// decode -> detect -> classify -> resolve -> build polygons -> render -> encode.
    ///
    /// The model label is validated before any image work. No detected
    /// face short-circuits to `PipelineOutcome::NoFace` without invoking
    /// the classifier or any downstream stage. Per-muscle gaps (missing
    /// geometry, unresolvable codes) shrink the output instead of
    /// failing the request.
    ///
    /// # Arguments
    /// * `image_bytes` - raw uploaded image bytes
    /// * `model_label` - classifier label registered in the model registry
    ///
    /// # Returns
    /// * `Result<PipelineOutcome>`
    pub async fn process(&self, image_bytes: &[u8], model_label: &str) -> Result<PipelineOutcome> {
        let classifier = self.registry.get(model_label)?;

        // the full-resolution decode stays the base for rendering
        let base_img = decode_image(image_bytes)?;

        let landmarks = match self.detector.detect(&base_img).await? {
            Some(landmarks) => landmarks,
            None => {
                debug!("no face detected, short-circuiting");
                return Ok(PipelineOutcome::NoFace);
            }
        };

        let input = to_input_tensor(&base_img, classifier.input_size(), self.config.pixel_scale)?;
        let probabilities = classifier.classify(&input).await?;
        let class_id = argmax(&probabilities).to_string();

        // mapping indices are rebuilt per request so document edits apply immediately
        let indices = self.mapping.load()?;
        let (label, muscles) = resolve(&class_id, &indices);

        let (img_w, img_h) = (base_img.cols(), base_img.rows());
        let mut overlays = Vec::with_capacity(muscles.len());
        for muscle in &muscles {
            if let Some(polygon) =
                build_polygon(&muscle.code, &landmarks, &indices.geometry, img_w, img_h)
            {
                overlays.push((polygon, muscle.color.clone()));
            }
        }

        let annotated = render_overlay(&base_img, &overlays)?;
        let encoded = encode_image(&annotated, &self.config.encode_ext)?;

        Ok(PipelineOutcome::Recognized(RecognitionResult {
            recognized_label: label,
            muscle_names: muscles.iter().map(|m| m.name.clone()).collect(),
            muscle_colors: muscles.iter().map(|m| m.color.clone()).collect(),
            annotated_image: encoded,
        }))
    }
}
