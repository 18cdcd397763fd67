use anyhow::Error;
use async_trait::async_trait;
use ndarray::Array4;

/// Seam for the external expression-classification model.
///
/// Implementations own their model handle and must be safe to share
/// across concurrent requests (stateless or internally synchronized);
/// the pipeline never mutates them.
#[async_trait]
pub trait ExpressionClassifier: Send + Sync {
    /// Input (width, height) the model was trained on; the pipeline
    /// resizes a copy of the request image to this shape.
    fn input_size(&self) -> (i32, i32);

    /// classify scores a batch-of-one NHWC tensor with pixel values in
    /// [0, 1] and returns the probability vector over expression classes.
    async fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>, Error>;
}
