//! Result records and the shared results file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};
use crate::stats::LatencyStats;

/// One timed segment: a single accessor variant against a single entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    pub benchmark_name: String,
    pub p99: f64,
    pub max: f64,
    pub min: f64,
    pub median: f64,
    pub avg: f64,
    pub spec_name: String,
    pub sdk_type: String,
    pub sdk_version: String,
}

impl BenchmarkResult {
    pub fn new(
        benchmark_name: impl Into<String>,
        spec_name: impl Into<String>,
        stats: &LatencyStats,
        sdk_type: impl Into<String>,
        sdk_version: impl Into<String>,
    ) -> Self {
        Self {
            benchmark_name: benchmark_name.into(),
            p99: stats.p99,
            max: stats.max,
            min: stats.min,
            median: stats.median,
            avg: stats.avg,
            spec_name: spec_name.into(),
            sdk_type: sdk_type.into(),
            sdk_version: sdk_version.into(),
        }
    }

    /// Aligned console line: name, p99, max, entity
    pub fn console_line(&self) -> String {
        format!(
            "{:<30} p99({:.4}ms){:<15} max({:.4}ms){:<15} {}",
            self.benchmark_name, self.p99, "", self.max, "", self.spec_name
        )
    }
}

/// Everything written to the shared volume at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsReport {
    pub sdk_type: String,
    pub sdk_version: String,
    pub results: Vec<BenchmarkResult>,
}

impl ResultsReport {
    pub fn new(
        sdk_type: impl Into<String>,
        sdk_version: impl Into<String>,
        results: Vec<BenchmarkResult>,
    ) -> Self {
        Self {
            sdk_type: sdk_type.into(),
            sdk_version: sdk_version.into(),
            results,
        }
    }

    /// `<sdk-type>-<sdk-version>-results.json`
    pub fn file_name(&self) -> String {
        format!("{}-{}-results.json", self.sdk_type, self.sdk_version)
    }

    /// Export the report as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report into `dir`, replacing any previous file, and return its path
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| BenchError::io(dir, e))?;

        let path = dir.join(self.file_name());
        let json = self.to_json()?;
        std::fs::write(&path, json).map_err(|e| BenchError::io(&path, e))?;

        tracing::info!(path = %path.display(), results = self.results.len(), "Wrote benchmark results");
        Ok(path)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Segment with the highest p99
    pub fn slowest(&self) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .max_by(|a, b| a.p99.total_cmp(&b.p99))
    }

    /// Print a compact summary
    pub fn print_summary(&self) {
        println!("\n=== Benchmark Summary ===");
        println!("SDK: {} v{}", self.sdk_type, self.sdk_version);
        println!("Segments: {}", self.results.len());

        if let Some(slowest) = self.slowest() {
            println!(
                "Slowest p99: {:.4}ms ({} on {})",
                slowest.p99, slowest.benchmark_name, slowest.spec_name
            );
        }
    }
}
