//! Random forest artifact
//!
//! JSON-serialized ensemble of binary decision trees written by the
//! `train_model` job. Each tree is a flat node array rooted at index 0;
//! children always come after their parent.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::{FEATURE_LAYOUT, FEATURE_VERSION, layout_hash};
use super::inference::{ChurnClassifier, InferenceError, LoadError};

pub const FOREST_MODEL_TYPE: &str = "random_forest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    /// Fraction of positive samples that reached this leaf
    Leaf { value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn predict(&self, features: &[f32]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    index = if features[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], index: usize) -> usize {
            match &nodes[index] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() || !(0.0..=1.0).contains(value) {
                        return Err(format!("leaf {} has value {} outside [0, 1]", index, value));
                    }
                }
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {} of {}", index, feature, n_features));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", index));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", index, child));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub model_type: String,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_names: Vec<String>,
    pub n_features: usize,
    pub n_samples: usize,
    pub trained_at: DateTime<Utc>,
    pub trees: Vec<DecisionTree>,
}

impl ForestModel {
    /// Wrap trained trees with the current feature layout
    pub fn new(trees: Vec<DecisionTree>, n_samples: usize) -> Self {
        Self {
            model_type: FOREST_MODEL_TYPE.to_string(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            n_features: FEATURE_LAYOUT.len(),
            n_samples,
            trained_at: Utc::now(),
            trees,
        }
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let model: ForestModel = serde_json::from_slice(bytes)?;
        model.validate()?;

        if let Err(e) = crate::features::layout::validate_layout(model.feature_version, model.layout_hash) {
            log::warn!("Forest artifact was trained on a different layout ({}); predictions may be meaningless", e);
        }

        Ok(model)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.model_type != FOREST_MODEL_TYPE {
            return Err(LoadError::UnsupportedFormat(self.model_type.clone()));
        }
        if self.trees.is_empty() {
            return Err(LoadError::Invalid("forest has no trees".to_string()));
        }
        if self.feature_names.len() != self.n_features {
            return Err(LoadError::Invalid(format!(
                "{} feature names for {} features",
                self.feature_names.len(),
                self.n_features
            )));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| LoadError::Invalid(format!("tree {}: {}", i, e)))?;
        }

        Ok(())
    }
}

impl ChurnClassifier for ForestModel {
    fn predict_proba(&self, features: &[f32]) -> Result<f64, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::ShapeMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn backend(&self) -> &'static str {
        FOREST_MODEL_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// charges <= 80 → 0.2, else contract <= 0.5 → 0.9 else 0.4
    fn stump_tree() -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 0, threshold: 80.0, left: 1, right: 2 },
                TreeNode::Leaf { value: 0.2 },
                TreeNode::Split { feature: 2, threshold: 0.5, left: 3, right: 4 },
                TreeNode::Leaf { value: 0.9 },
                TreeNode::Leaf { value: 0.4 },
            ],
        }
    }

    fn leaf_tree(value: f64) -> DecisionTree {
        DecisionTree { nodes: vec![TreeNode::Leaf { value }] }
    }

    #[test]
    fn test_tree_traversal() {
        let tree = stump_tree();
        assert_eq!(tree.predict(&[50.0, 1.0, 0.0]), 0.2);
        assert_eq!(tree.predict(&[80.0, 1.0, 0.0]), 0.2);
        assert_eq!(tree.predict(&[90.0, 1.0, 0.0]), 0.9);
        assert_eq!(tree.predict(&[90.0, 1.0, 2.0]), 0.4);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = ForestModel::new(vec![stump_tree(), leaf_tree(0.5)], 10);
        let p = forest.predict_proba(&[90.0, 1.0, 0.0]).unwrap();
        assert!((p - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_forest_rejects_wrong_shape() {
        let forest = ForestModel::new(vec![leaf_tree(0.5)], 1);
        let err = forest.predict_proba(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, InferenceError::ShapeMismatch { expected: 3, actual: 2 });
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("churn_model.json");
        let forest = ForestModel::new(vec![stump_tree()], 5);

        forest.save(&path).unwrap();
        let loaded = ForestModel::load(&path).unwrap();

        assert_eq!(loaded, forest);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ForestModel::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_load_garbage() {
        let err = ForestModel::from_slice(b"\x80\x04pickle").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_rejects_invalid_structure() {
        let mut forest = ForestModel::new(vec![stump_tree()], 5);
        forest.trees[0].nodes[0] = TreeNode::Split { feature: 0, threshold: 1.0, left: 0, right: 2 };
        let bytes = serde_json::to_vec(&forest).unwrap();
        assert!(matches!(ForestModel::from_slice(&bytes), Err(LoadError::Invalid(_))));

        let empty = ForestModel::new(vec![], 0);
        let bytes = serde_json::to_vec(&empty).unwrap();
        assert!(matches!(ForestModel::from_slice(&bytes), Err(LoadError::Invalid(_))));

        let out_of_range = ForestModel::new(vec![leaf_tree(1.5)], 1);
        let bytes = serde_json::to_vec(&out_of_range).unwrap();
        assert!(matches!(ForestModel::from_slice(&bytes), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unknown_model_type() {
        let mut forest = ForestModel::new(vec![leaf_tree(0.1)], 1);
        forest.model_type = "gradient_boosting".to_string();
        let bytes = serde_json::to_vec(&forest).unwrap();
        assert!(matches!(ForestModel::from_slice(&bytes), Err(LoadError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_layout_drift_still_loads() {
        let mut forest = ForestModel::new(vec![leaf_tree(0.1)], 1);
        forest.layout_hash ^= 0xFFFF;
        let bytes = serde_json::to_vec(&forest).unwrap();
        assert!(ForestModel::from_slice(&bytes).is_ok());
    }

    #[test]
    fn test_wider_model_fails_per_request() {
        let mut forest = ForestModel::new(vec![leaf_tree(0.1)], 1);
        forest.n_features = 4;
        forest.feature_names.push("tenure".to_string());
        let bytes = serde_json::to_vec(&forest).unwrap();
        let loaded = ForestModel::from_slice(&bytes).unwrap();

        assert!(matches!(
            loaded.predict_proba(&[1.0, 2.0, 0.0]),
            Err(InferenceError::ShapeMismatch { expected: 4, actual: 3 })
        ));
    }
}
