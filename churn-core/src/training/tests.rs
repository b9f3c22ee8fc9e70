use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::customer::CustomerRecord;
use crate::features::encode;
use crate::model::{ChurnClassifier, ForestModel};
use crate::predictor::ChurnPredictor;
use super::*;

fn sample(charges: f64, services: u32, contract: &str, churn: bool) -> TrainingSample {
    let record = CustomerRecord::new("t", charges, services, contract);
    let features = encode(&record);
    TrainingSample { record, features, churn }
}

/// Churn iff charges > 80
fn separable_samples() -> Vec<TrainingSample> {
    (0..100)
        .map(|i| {
            let charges = 20.0 + i as f64;
            sample(charges, 1 + (i % 4) as u32, "One year", charges > 80.0)
        })
        .collect()
}

fn small_params(n_trees: usize) -> ForestParams {
    ForestParams { n_trees, ..Default::default() }
}

#[test]
fn test_churn_score_rules() {
    assert_eq!(churn_score(90.0, 1, 0), 8);
    assert_eq!(churn_score(80.0, 1, 0), 5);
    assert_eq!(churn_score(50.0, 2, 1), 0);
    assert_eq!(churn_score(100.0, 3, 2), 3);
    assert!((churn_probability(90.0, 1, 0) - 0.8).abs() < 1e-12);
}

#[test]
fn test_generated_dataset_ranges() {
    let mut rng = StdRng::seed_from_u64(42);
    let samples = generate_dataset(500, &mut rng);

    assert_eq!(samples.len(), 500);
    for s in &samples {
        assert!((20.0..120.0).contains(&s.record.monthly_charges));
        assert!((1..=4).contains(&s.record.total_services));
        assert_eq!(s.features, encode(&s.record));
    }
    // Score-0 customers never churn
    assert!(samples
        .iter()
        .filter(|s| churn_score(s.record.monthly_charges, s.record.total_services, s.features.values[2] as u8) == 0)
        .all(|s| !s.churn));
}

#[test]
fn test_generated_dataset_is_seeded() {
    let a = generate_dataset(50, &mut StdRng::seed_from_u64(7));
    let b = generate_dataset(50, &mut StdRng::seed_from_u64(7));
    let c = generate_dataset(50, &mut StdRng::seed_from_u64(8));

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_gini() {
    assert_eq!(trainer::gini(0, 10), 0.0);
    assert_eq!(trainer::gini(10, 10), 0.0);
    assert_eq!(trainer::gini(5, 10), 0.5);
    assert_eq!(trainer::gini(0, 0), 0.0);
    assert_eq!(trainer::default_max_features(3), 1);
    assert_eq!(trainer::default_max_features(1), 1);
}

#[test]
fn test_forest_learns_separable_rule() {
    let samples = separable_samples();
    let model = train_forest(&samples, &small_params(10));

    assert_eq!(model.trees.len(), 10);
    assert!(model.predict_proba(&[110.0, 2.0, 1.0]).unwrap() > 0.9);
    assert!(model.predict_proba(&[30.0, 2.0, 1.0]).unwrap() < 0.1);
    assert!(accuracy(&model, &samples) > 0.95);
}

#[test]
fn test_training_is_deterministic() {
    let samples = separable_samples();
    let a = train_forest(&samples, &small_params(5));
    let b = train_forest(&samples, &small_params(5));

    assert_eq!(a.trees, b.trees);
}

#[test]
fn test_max_depth_is_respected() {
    let mut rng = StdRng::seed_from_u64(1);
    let samples = generate_dataset(300, &mut rng);
    let params = ForestParams { n_trees: 5, max_depth: Some(2), ..Default::default() };

    let model = train_forest(&samples, &params);
    assert!(model.trees.iter().all(|t| t.depth() <= 2));
}

#[test]
fn test_trained_forest_passes_artifact_validation() {
    let mut rng = StdRng::seed_from_u64(3);
    let samples = generate_dataset(200, &mut rng);
    let model = train_forest(&samples, &small_params(3));

    let bytes = serde_json::to_vec(&model).unwrap();
    let loaded = ForestModel::from_slice(&bytes).unwrap();
    assert_eq!(loaded.trees, model.trees);
}

#[test]
fn test_forest_follows_churn_rule() {
    let (model, _) = build_model(&TrainingConfig::default());

    let risky = model.predict_proba(&[110.0, 1.0, 0.0]).unwrap();
    let safe = model.predict_proba(&[30.0, 4.0, 2.0]).unwrap();
    assert!(risky > safe + 0.3, "risky {} safe {}", risky, safe);
}

#[test]
fn test_run_writes_artifact_and_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrainingConfig {
        model_path: dir.path().join("models").join("churn_model.json"),
        samples: 120,
        forest: small_params(4),
        dataset_path: Some(dir.path().join("dataset.jsonl")),
    };

    let report = run(&config).unwrap();
    assert_eq!(report.samples, 120);
    assert_eq!(report.trees, 4);
    assert!((0.0..=1.0).contains(&report.churn_rate));

    let dataset = std::fs::read_to_string(dir.path().join("dataset.jsonl")).unwrap();
    let lines: Vec<&str> = dataset.lines().collect();
    assert_eq!(lines.len(), 120);
    let first: DatasetRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first.features.len(), 3);

    let predictor = ChurnPredictor::load(&config.model_path);
    assert!(predictor.is_model_loaded());
    let result = predictor
        .predict(&CustomerRecord::new("c1", 90.0, 1, "Month-to-month"))
        .unwrap();
    assert!((0.0..=1.0).contains(&result.churn_probability));
}

#[test]
fn test_run_rejects_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrainingConfig {
        model_path: dir.path().join("churn_model.json"),
        samples: 0,
        ..Default::default()
    };

    assert!(run(&config).is_err());
    assert!(!config.model_path.exists());
}

#[test]
fn test_env_file_is_loaded_before_config() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(&env_file, "TRAIN_TREES=7\nCHURN_TRAINER_LOG_LEVEL=debug\n").unwrap();

    let config = load_env_config(Some(&env_file));

    assert_eq!(config.forest.n_trees, 7);
    assert_eq!(std::env::var("CHURN_TRAINER_LOG_LEVEL").unwrap(), "debug");
}

#[test]
fn test_missing_env_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_env_config(Some(&dir.path().join("absent.env")));
    assert_eq!(config.samples, TrainingConfig::default().samples);
}
