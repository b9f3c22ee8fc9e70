//! ONNX Runtime backend
//!
//! Serves classifiers exported to ONNX (e.g. a scikit-learn forest
//! converted with zipmap disabled). `Session::run` needs `&mut`, so calls
//! are serialized through a mutex.

use std::path::Path;

use ndarray::Array2;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;
use parking_lot::Mutex;

use crate::features::FEATURE_COUNT;
use super::inference::{ChurnClassifier, InferenceError, LoadError};

/// Output name used by scikit-learn classifier exports
const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxModel {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxModel {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        log::info!("Loading ONNX model from: {}", path.display());

        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| LoadError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| LoadError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| LoadError::Runtime(format!("Failed to load model: {}", e)))?;

        let output_name = session.outputs.iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| LoadError::Invalid("No output defined".to_string()))?;

        log::info!("ONNX model loaded, reading output '{}'", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl ChurnClassifier for OnnxModel {
    fn predict_proba(&self, features: &[f32]) -> Result<f64, InferenceError> {
        if features.len() != FEATURE_COUNT {
            return Err(InferenceError::ShapeMismatch {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }

        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs.get(&self.output_name)
            .ok_or_else(|| InferenceError::Runtime(format!("No output '{}'", self.output_name)))?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        // [1, 2] class probabilities → column 1; single-column models emit p directly
        let probability = match data.len() {
            0 => return Err(InferenceError::Runtime("Empty output tensor".to_string())),
            1 => data[0],
            _ => data[1],
        };

        Ok(f64::from(probability))
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}
