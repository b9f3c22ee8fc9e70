//! Random forest trainer
//!
//! Bagged CART trees split on Gini impurity. Each node looks at a random
//! subset of `max_features` features, and keeps looking past that subset
//! until at least one valid split is found.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::features::FEATURE_COUNT;
use crate::model::{DecisionTree, ForestModel, TreeNode};
use super::synthetic::TrainingSample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 50,
            max_depth: None,
            min_samples_split: 2,
            max_features: default_max_features(FEATURE_COUNT),
            seed: 42,
        }
    }
}

/// floor(sqrt(n)), at least 1
pub fn default_max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().floor() as usize).max(1)
}

pub fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f32,
    impurity: f64,
}

struct TreeBuilder<'a> {
    rows: &'a [[f32; FEATURE_COUNT]],
    labels: &'a [bool],
    params: &'a ForestParams,
    rng: StdRng,
    nodes: Vec<TreeNode>,
}

impl<'a> TreeBuilder<'a> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let node_id = self.nodes.len();
        let total = indices.len();
        let positives = indices.iter().filter(|&&i| self.labels[i]).count();

        self.nodes.push(TreeNode::Leaf { value: positives as f64 / total as f64 });

        let depth_reached = self.params.max_depth.map_or(false, |max| depth >= max);
        let pure = positives == 0 || positives == total;
        if depth_reached || pure || total < self.params.min_samples_split {
            return node_id;
        }

        let Some(split) = self.best_split(&indices) else {
            return node_id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.rows[i][split.feature] <= split.threshold);

        let left_id = self.grow(left, depth + 1);
        let right_id = self.grow(right, depth + 1);

        self.nodes[node_id] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: left_id,
            right: right_id,
        };

        node_id
    }

    fn best_split(&mut self, indices: &[usize]) -> Option<Split> {
        let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
        features.shuffle(&mut self.rng);

        let mut best: Option<Split> = None;
        for (visited, &feature) in features.iter().enumerate() {
            if visited >= self.params.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_split_on(feature, indices) {
                if best.map_or(true, |b| candidate.impurity < b.impurity) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Sweep sorted values, scoring every boundary between distinct values
    fn best_split_on(&self, feature: usize, indices: &[usize]) -> Option<Split> {
        let mut column: Vec<(f32, bool)> = indices
            .iter()
            .map(|&i| (self.rows[i][feature], self.labels[i]))
            .collect();
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total = column.len();
        if total < 2 {
            return None;
        }
        let total_positives = column.iter().filter(|(_, y)| *y).count();

        let mut best: Option<Split> = None;
        let mut left_positives = 0;

        for i in 0..total - 1 {
            if column[i].1 {
                left_positives += 1;
            }
            let (value, next) = (column[i].0, column[i + 1].0);
            if value >= next {
                continue;
            }

            let left_total = i + 1;
            let right_total = total - left_total;
            let impurity = (gini(left_positives, left_total) * left_total as f64
                + gini(total_positives - left_positives, right_total) * right_total as f64)
                / total as f64;

            if best.map_or(true, |b| impurity < b.impurity) {
                let mut threshold = value + (next - value) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(Split { feature, threshold, impurity });
            }
        }

        best
    }
}

/// Fit a forest on `samples`. Same samples and params give the same forest.
pub fn train_forest(samples: &[TrainingSample], params: &ForestParams) -> ForestModel {
    let rows: Vec<[f32; FEATURE_COUNT]> = samples.iter().map(|s| s.features.values).collect();
    let labels: Vec<bool> = samples.iter().map(|s| s.churn).collect();
    let n = rows.len();

    let mut seeder = StdRng::seed_from_u64(params.seed);
    let mut trees = Vec::with_capacity(params.n_trees);

    if n > 0 {
        for t in 0..params.n_trees {
            let mut rng = StdRng::seed_from_u64(seeder.gen());
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut builder = TreeBuilder {
                rows: &rows,
                labels: &labels,
                params,
                rng,
                nodes: Vec::new(),
            };
            builder.grow(bootstrap, 0);

            log::debug!("Tree {} grown with {} nodes", t, builder.nodes.len());
            trees.push(DecisionTree { nodes: builder.nodes });
        }
    }

    ForestModel::new(trees, n)
}

/// Fraction of samples whose 0.5-thresholded prediction matches the label
pub fn accuracy(model: &ForestModel, samples: &[TrainingSample]) -> f64 {
    use crate::model::ChurnClassifier;

    if samples.is_empty() {
        return 0.0;
    }

    let correct = samples
        .iter()
        .filter(|s| {
            model
                .predict_proba(s.features.as_slice())
                .map(|p| (p > 0.5) == s.churn)
                .unwrap_or(false)
        })
        .count();

    correct as f64 / samples.len() as f64
}
