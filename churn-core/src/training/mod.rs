//! Training Module - offline batch job producing the model artifact
//!
//! Generates a synthetic labelled dataset, fits a random forest on it and
//! writes the forest artifact the server loads at startup.

pub mod synthetic;
pub mod trainer;
pub mod writer;

#[cfg(test)]
mod tests;

use std::env;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use synthetic::{churn_probability, churn_score, generate_dataset, TrainingSample};
pub use trainer::{accuracy, train_forest, ForestParams};
pub use writer::{write_jsonl, DatasetRecord};

use crate::model::ForestModel;

pub const DEFAULT_MODEL_PATH: &str = "models/churn_model.json";

/// Training job configuration
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Where the forest artifact is written
    pub model_path: PathBuf,

    /// Number of synthetic customers
    pub samples: usize,

    pub forest: ForestParams,

    /// Optional JSONL export of the generated dataset
    pub dataset_path: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            samples: 1000,
            forest: ForestParams::default(),
            dataset_path: None,
        }
    }
}

impl TrainingConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            samples: env::var("TRAIN_SAMPLES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.samples),

            forest: ForestParams {
                n_trees: env::var("TRAIN_TREES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.forest.n_trees),

                max_depth: env::var("TRAIN_MAX_DEPTH")
                    .ok()
                    .and_then(|v| v.parse().ok()),

                seed: env::var("TRAIN_SEED")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.forest.seed),

                ..defaults.forest
            },

            dataset_path: env::var("TRAIN_DATASET_PATH").ok().map(PathBuf::from),
        }
    }
}

/// Load `.env` (or `env_file`) into the process environment, then read the
/// config. Must run before the logger is built so `RUST_LOG` from the file applies.
pub fn load_env_config(env_file: Option<&Path>) -> TrainingConfig {
    let loaded = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    if let Err(e) = loaded {
        if !e.not_found() {
            eprintln!("Ignoring unreadable env file: {}", e);
        }
    }

    TrainingConfig::from_env()
}

/// Summary of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub samples: usize,
    pub churn_rate: f64,
    pub trees: usize,
    pub train_accuracy: f64,
}

/// Generate data and fit the forest. The dataset is seeded with the forest seed.
pub fn build_model(config: &TrainingConfig) -> (ForestModel, Vec<TrainingSample>) {
    let mut rng = StdRng::seed_from_u64(config.forest.seed);
    let samples = generate_dataset(config.samples, &mut rng);
    let model = train_forest(&samples, &config.forest);
    (model, samples)
}

/// Full batch job: generate, optionally export, train, save
pub fn run(config: &TrainingConfig) -> anyhow::Result<TrainingReport> {
    anyhow::ensure!(config.samples > 0, "TRAIN_SAMPLES must be positive");
    anyhow::ensure!(config.forest.n_trees > 0, "TRAIN_TREES must be positive");

    log::info!("Training on {} synthetic customers...", config.samples);
    let (model, samples) = build_model(config);

    if let Some(path) = &config.dataset_path {
        write_jsonl(path, &samples)?;
    }

    let churned = samples.iter().filter(|s| s.churn).count();
    let report = TrainingReport {
        samples: samples.len(),
        churn_rate: churned as f64 / samples.len() as f64,
        trees: model.trees.len(),
        train_accuracy: accuracy(&model, &samples),
    };

    model.save(&config.model_path)?;
    log::info!(
        "Model saved to {} ({} trees, churn rate {:.1}%, train accuracy {:.1}%)",
        config.model_path.display(),
        report.trees,
        report.churn_rate * 100.0,
        report.train_accuracy * 100.0
    );

    Ok(report)
}
