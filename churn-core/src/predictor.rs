//! Churn Predictor - the request path
//!
//! encode → classify → tier → round → action.
//!
//! The classifier is loaded once at startup and shared read-only. A failed
//! load leaves the predictor degraded instead of aborting the process.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::customer::CustomerRecord;
use crate::features::{encode, LayoutInfo};
use crate::model::{load_classifier, ChurnClassifier, InferenceError, ModelMetadata};
use crate::risk::{round_probability, RiskTier};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Rounded to 2 decimals
    pub churn_probability: f64,
    pub risk_level: RiskTier,
    pub recommended_action: String,
}

/// Engine Status for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model: Option<ModelMetadata>,
    pub layout: LayoutInfo,
    pub avg_latency_ms: f64,
    pub inference_count: u64,
}

pub struct ChurnPredictor {
    classifier: Option<Arc<dyn ChurnClassifier>>,
    metadata: Option<ModelMetadata>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl ChurnPredictor {
    /// Load the classifier at `path`; never fails, degrades instead
    pub fn load(path: &Path) -> Self {
        match load_classifier(path) {
            Ok(classifier) => {
                let metadata = ModelMetadata {
                    model_path: path.display().to_string(),
                    backend: classifier.backend().to_string(),
                    features: classifier.n_features(),
                    loaded_at: Utc::now(),
                };
                Self::new(Some(Arc::from(classifier)), Some(metadata))
            }
            Err(e) => {
                log::warn!("{} - service will run degraded", e);
                Self::unavailable()
            }
        }
    }

    /// Use an already constructed classifier (test doubles, embedding)
    pub fn with_classifier(classifier: Arc<dyn ChurnClassifier>) -> Self {
        let metadata = ModelMetadata {
            model_path: "<memory>".to_string(),
            backend: classifier.backend().to_string(),
            features: classifier.n_features(),
            loaded_at: Utc::now(),
        };
        Self::new(Some(classifier), Some(metadata))
    }

    pub fn unavailable() -> Self {
        Self::new(None, None)
    }

    fn new(classifier: Option<Arc<dyn ChurnClassifier>>, metadata: Option<ModelMetadata>) -> Self {
        Self {
            classifier,
            metadata,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult, PredictError> {
        let classifier = self.classifier.as_ref().ok_or(PredictError::ModelUnavailable)?;

        let vector = encode(record);
        log::debug!("Encoded {}: {}", record.customer_id, vector.to_log_entry());

        let start_time = Instant::now();
        let probability = classifier.predict_proba(vector.as_slice())?;
        let elapsed_us = start_time.elapsed().as_micros() as u64;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::InvalidOutput(probability).into());
        }

        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        let tier = RiskTier::from_probability(probability);

        Ok(PredictionResult {
            churn_probability: round_probability(probability),
            risk_level: tier,
            recommended_action: tier.recommended_action().to_string(),
        })
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: self.is_model_loaded(),
            model: self.metadata.clone(),
            layout: LayoutInfo::current(),
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}
