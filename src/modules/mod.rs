pub mod classifier_client;
pub mod landmark_detector;
pub mod model_registry;
