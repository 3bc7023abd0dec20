//! Experiment tracking: one record per training run.

use crate::error::{PricingError, Result};
use crate::metrics::RegressionMetrics;
use crate::pipeline::TrainerSettings;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub experiment: String,
    pub run_id: String,
    pub model_name: String,
    pub artifact_key: String,
    pub recorded_at: String,
    pub settings: TrainerSettings,
    pub n_train: usize,
    pub n_test: usize,
    pub metrics: RegressionMetrics,
}

pub trait MetricsSink: Send + Sync {
    fn record(&self, run: &RunRecord) -> Result<()>;
}

/// Appends each run as one JSON line.
#[derive(Debug)]
pub struct JsonlMetricsSink {
    path: PathBuf,
}

impl JsonlMetricsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every run recorded so far, oldest first.
    pub fn read_all(&self) -> Result<Vec<RunRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        fs::read_to_string(&self.path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(PricingError::data))
            .collect()
    }
}

impl MetricsSink for JsonlMetricsSink {
    fn record(&self, run: &RunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut line = serde_json::to_string(run).map_err(PricingError::data)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        tracing::info!(
            run_id = %run.run_id,
            rmse = run.metrics.rmse,
            mae = run.metrics.mae,
            r2 = run.metrics.r2,
            "run metrics recorded"
        );
        Ok(())
    }
}

/// Keeps runs in memory.
#[derive(Debug, Default)]
pub struct MemoryMetricsSink {
    runs: Mutex<Vec<RunRecord>>,
}

impl MemoryMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> Vec<RunRecord> {
        self.runs.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl MetricsSink for MemoryMetricsSink {
    fn record(&self, run: &RunRecord) -> Result<()> {
        self.runs
            .lock()
            .map_err(|_| PricingError::Data("metrics sink lock poisoned".into()))?
            .push(run.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(id: &str) -> RunRecord {
        RunRecord {
            experiment: "pricing".into(),
            run_id: id.into(),
            model_name: "getaround_pricing".into(),
            artifact_key: format!("models/getaround_pricing_{}.bin", id),
            recorded_at: "2026-01-01T00:00:00+00:00".into(),
            settings: TrainerSettings::default(),
            n_train: 8,
            n_test: 2,
            metrics: RegressionMetrics {
                rmse: 1.5,
                mae: 1.0,
                r2: 0.9,
            },
        }
    }

    #[test]
    fn test_jsonl_appends() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlMetricsSink::new(dir.path().join("runs/metrics.jsonl"));
        assert!(sink.read_all().unwrap().is_empty());

        sink.record(&run("a")).unwrap();
        sink.record(&run("b")).unwrap();
        let runs = sink.read_all().unwrap();
        assert_eq!(runs, vec![run("a"), run("b")]);
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemoryMetricsSink::new();
        sink.record(&run("x")).unwrap();
        assert_eq!(sink.runs().len(), 1);
        assert_eq!(sink.runs()[0].run_id, "x");
    }
}
