//! Offline training job
//!
//! Writes the forest artifact served by `ai-engine`. Configured through
//! environment variables (a `.env` file is honored):
//! `MODEL_PATH`, `TRAIN_SAMPLES`, `TRAIN_TREES`, `TRAIN_MAX_DEPTH`,
//! `TRAIN_SEED`, `TRAIN_DATASET_PATH`, `RUST_LOG`.

use churn_core::training;

fn main() -> anyhow::Result<()> {
    let config = training::load_env_config(None);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Building churn model: {:?}", config);
    let report = training::run(&config)?;

    log::info!(
        "Done: {} samples, {} trees, train accuracy {:.3}",
        report.samples,
        report.trees,
        report.train_accuracy
    );

    Ok(())
}
