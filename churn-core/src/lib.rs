//! ChurnInsight core
//!
//! Feature encoding, churn classifier backends, risk mapping and the
//! offline training job that produces the model artifact.
//!
//! ```text
//! CustomerRecord ──encode──▶ FeatureVector ──ChurnClassifier──▶ p
//!                                                               │
//!                      PredictionResult ◀── RiskTier / action ◀─┘
//! ```

pub mod customer;
pub mod features;
pub mod model;
pub mod risk;
pub mod predictor;
pub mod training;

pub use customer::CustomerRecord;
pub use features::{encode, FeatureVector};
pub use model::{ChurnClassifier, InferenceError, LoadError};
pub use predictor::{ChurnPredictor, EngineStatus, PredictError, PredictionResult};
pub use risk::RiskTier;
