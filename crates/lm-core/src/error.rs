//! Errors raised by the document model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to encode document snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode document snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("invalid color value: {0:?}")]
    InvalidColor(String),

    #[error("canvas size {width}x{height} is outside {min}..={max} px")]
    CanvasSize {
        width: f64,
        height: f64,
        min: f64,
        max: f64,
    },
}
