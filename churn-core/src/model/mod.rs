//! Model Module - Churn classifier backends
//!
//! Forest artifacts are served natively; ONNX exports are available behind
//! the `onnx` feature.

pub mod inference;
pub mod forest;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use inference::{ChurnClassifier, InferenceError, LoadError, ModelMetadata};
pub use forest::{DecisionTree, ForestModel, TreeNode};
pub use loader::load_classifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
