//! Model artifact loading
//!
//! The artifact format is picked from the file extension: `.onnx` goes to
//! ONNX Runtime, anything else is read as a forest artifact.

use std::path::Path;

use super::forest::ForestModel;
use super::inference::{ChurnClassifier, LoadError};

pub fn load_classifier(path: &Path) -> Result<Box<dyn ChurnClassifier>, LoadError> {
    let is_onnx = path.extension().map_or(false, |e| e.eq_ignore_ascii_case("onnx"));

    if is_onnx {
        return load_onnx(path);
    }

    log::info!("Loading forest model from: {}", path.display());
    let forest = ForestModel::load(path)?;
    log::info!(
        "Forest model loaded: {} trees, {} features, trained on {} samples",
        forest.trees.len(),
        forest.n_features,
        forest.n_samples
    );

    Ok(Box::new(forest))
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> Result<Box<dyn ChurnClassifier>, LoadError> {
    Ok(Box::new(super::onnx::OnnxModel::load(path)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path) -> Result<Box<dyn ChurnClassifier>, LoadError> {
    Err(LoadError::UnsupportedFormat(format!(
        "{} (built without the `onnx` feature)",
        path.display()
    )))
}
