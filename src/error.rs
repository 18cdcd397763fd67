use thiserror::Error;

/// Error taxonomy for one pipeline request.
///
/// "No face detected" is deliberately absent: it is a normal terminal
/// outcome, see `PipelineOutcome::NoFace`. Per-element lookup gaps
/// (missing geometry, unresolvable codes, bad colors) never surface
/// here either; they degrade the result and are logged instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("mapping config error: {0}")]
    Config(String),

    #[error("invalid model label: {0}")]
    InvalidModelLabel(String),

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("image encode error: {0}")]
    Encode(String),

    #[error("opencv error: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error("inference error: {0}")]
    Inference(#[from] anyhow::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
