//! Dataset export - JSONL, one labelled row per line

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::synthetic::TrainingSample;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub customer_id: String,

    // Feature contract
    pub feature_version: u8,
    pub layout_hash: u32,
    pub features: Vec<f32>,

    pub churn: u8,
}

impl From<&TrainingSample> for DatasetRecord {
    fn from(sample: &TrainingSample) -> Self {
        Self {
            customer_id: sample.record.customer_id.clone(),
            feature_version: sample.features.version,
            layout_hash: sample.features.layout_hash,
            features: sample.features.values.to_vec(),
            churn: u8::from(sample.churn),
        }
    }
}

/// Write `samples` to `path` (truncating), returning the number of lines
pub fn write_jsonl(path: &Path, samples: &[TrainingSample]) -> io::Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for sample in samples {
        let json = serde_json::to_string(&DatasetRecord::from(sample))?;
        writeln!(writer, "{}", json)?;
    }
    writer.flush()?;

    log::info!("Exported {} dataset rows to {}", samples.len(), path.display());
    Ok(samples.len())
}
