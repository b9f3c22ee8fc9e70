//! Inference Engine - classifier seam and error types
//!
//! A loaded classifier is immutable and shared by every request, so
//! implementations must be safe for concurrent `&self` calls.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Per-request inference failure. Never fatal to the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Feature shape mismatch: model expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Classifier returned an invalid probability: {0}")]
    InvalidOutput(f64),

    #[error("Inference failed: {0}")]
    Runtime(String),
}

/// Startup failure while loading a model artifact
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read model {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    #[error("Model runtime error: {0}")]
    Runtime(String),
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary churn classifier (forest, ONNX, test doubles)
pub trait ChurnClassifier: Send + Sync {
    /// Probability of the positive ("will churn") class
    fn predict_proba(&self, features: &[f32]) -> Result<f64, InferenceError>;

    /// Number of input features the model was trained on
    fn n_features(&self) -> usize;

    /// Short backend name, e.g. "random_forest" or "onnx"
    fn backend(&self) -> &'static str;
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub backend: String,
    pub features: usize,
    pub loaded_at: DateTime<Utc>,
}
