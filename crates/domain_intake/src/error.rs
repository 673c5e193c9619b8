//! Intake domain errors

use thiserror::Error;

/// Problems with the shape or content of a training table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Training dataset is empty")]
    EmptyDataset,

    #[error("Required column missing: {column}")]
    MissingColumn { column: String },

    #[error("Invalid value in row {row}, column {column}: {message}")]
    InvalidValue {
        row: usize,
        column: String,
        message: String,
    },

    #[error("Malformed training data: {0}")]
    Malformed(String),
}

/// Errors that can occur in the intake engine
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Model fitting failed: {0}")]
    Fit(String),

    #[error("Model not loaded. Please train the system first.")]
    ModelNotLoaded,

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl IntakeError {
    pub fn fit(message: impl Into<String>) -> Self {
        IntakeError::Fit(message.into())
    }

    pub fn inference(message: impl Into<String>) -> Self {
        IntakeError::Inference(message.into())
    }

    /// True when the caller can succeed by training a bundle first
    pub fn is_retryable_after_training(&self) -> bool {
        matches!(self, IntakeError::ModelNotLoaded)
    }

    /// True when the training input itself was rejected
    pub fn is_schema(&self) -> bool {
        matches!(self, IntakeError::Schema(_))
    }
}
