//! Error types for sr-eval operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sr-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during super-resolution evaluation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Failed to load an image file.
    #[error("Image load failed: {path}: {reason}")]
    ImageLoad {
        /// Path to the image that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Image dimensions don't match between estimated and reference images.
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height).
        expected: (usize, usize),
        /// Actual dimensions (width, height).
        actual: (usize, usize),
    },

    /// Channel count or channel order differs between the two images.
    #[error("Channel mismatch: expected {expected}, got {actual}")]
    ChannelMismatch {
        /// Expected channel layout.
        expected: String,
        /// Actual channel layout.
        actual: String,
    },

    /// Border cropping leaves no pixels.
    #[error("Border {border} crops away a {width}x{height} image entirely")]
    EmptyCrop {
        /// Border width in pixels.
        border: usize,
        /// Image width before cropping.
        width: usize,
        /// Image height before cropping.
        height: usize,
    },

    /// Image is smaller than a metric's window after cropping.
    #[error("{metric} needs at least {min}x{min} pixels, got {width}x{height}")]
    ImageTooSmall {
        /// Name of the metric.
        metric: &'static str,
        /// Minimum side length.
        min: usize,
        /// Cropped width.
        width: usize,
        /// Cropped height.
        height: usize,
    },

    /// Operation is not defined for the image's channel order.
    #[error("Invalid color order for {operation}: {order}")]
    InvalidColorOrder {
        /// Operation that was attempted.
        operation: &'static str,
        /// Channel order of the input.
        order: String,
    },

    /// Invalid or inconsistent options document.
    #[error("Config error: {0}")]
    Config(String),

    /// Dataset could not be built or read.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Model construction or inference failed.
    #[error("Model error ({model}): {message}")]
    Model {
        /// Model identifier.
        model: String,
        /// Error message from the model.
        message: String,
    },

    /// The test set produced no samples.
    #[error("Dataset {0} contains no samples")]
    EmptyDataset(String),

    /// Unsupported dataset type or image format.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Image encode/decode error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
