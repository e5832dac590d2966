//! End-to-end run: manifest, SDK lifecycle, sweep, results file.

use serde_json::json;
use std::path::{Path, PathBuf};

use crate::client::FlagClient;
use crate::config::Config;
use crate::error::{BenchError, Result};
use crate::manifest::ManifestLoader;
use crate::report::ResultsReport;
use crate::runner::{BenchmarkRunner, RunnerSettings};
use crate::user::SyntheticUser;

/// What a completed run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub report: ResultsReport,
    pub path: PathBuf,
}

/// Load the manifest, drive the SDK through the sweep and persist the results.
///
/// The SDK is initialized only after the manifest shows up, so a missing
/// manifest never touches the network.
pub async fn run<C: FlagClient>(config: &Config, client: &C) -> Result<RunOutcome> {
    let loader = ManifestLoader::new(
        config.manifest_path(),
        config.poll_attempts,
        config.poll_interval,
    );
    tracing::info!(path = %loader.path().display(), "Waiting for spec names manifest...");
    let names = loader.load().await?;
    tracing::info!("✅ Manifest loaded ({} entities)", names.total());

    if let Some(path) = &config.metadata_file {
        write_metadata(path, &config.sdk_type, &config.sdk_version)?;
    }

    tracing::info!(specs_url = %config.specs_url(), "Initializing SDK...");
    client.initialize().await?;
    tracing::info!("✅ SDK initialized");

    println!("Statsig {} (v{})", config.sdk_type, config.sdk_version);
    println!("--------------------------------");

    let results = BenchmarkRunner::new(client, RunnerSettings::from(config))
        .run(&names)
        .await?;

    if config.ci {
        let global_user = client.create_user(&SyntheticUser::global());
        let mut logged = 0;
        for result in &results {
            match client.log_benchmark(&global_user, result) {
                Ok(()) => logged += 1,
                Err(e) => tracing::warn!(
                    benchmark = %result.benchmark_name,
                    spec = %result.spec_name,
                    "Failed to log benchmark event: {}",
                    e
                ),
            }
        }
        tracing::info!(events = logged, total = results.len(), "Logged benchmark events");
    }

    if let Err(e) = client.shutdown(config.shutdown_timeout).await {
        tracing::warn!("SDK shutdown did not complete cleanly: {}", e);
    }

    let report = ResultsReport::new(&config.sdk_type, &config.sdk_version, results);
    let path = report.write_to_dir(&config.shared_dir)?;

    if let Some(slowest) = report.slowest() {
        tracing::info!(
            slowest = %slowest.benchmark_name,
            spec = %slowest.spec_name,
            p99_ms = slowest.p99,
            "Run complete"
        );
    }

    Ok(RunOutcome { report, path })
}

/// `{"sdk_type": ..., "sdk_version": ...}` for the cluster scripts
pub fn write_metadata(path: &Path, sdk_type: &str, sdk_version: &str) -> Result<()> {
    let metadata = json!({
        "sdk_type": sdk_type,
        "sdk_version": sdk_version,
    });
    std::fs::write(path, serde_json::to_string(&metadata)?).map_err(|e| BenchError::io(path, e))?;
    tracing::debug!(path = %path.display(), "Wrote benchmark metadata");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");

        write_metadata(&path, "statsig-server-core-rust", "0.1.0").unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["sdk_type"], "statsig-server-core-rust");
        assert_eq!(value["sdk_version"], "0.1.0");
    }

    #[test]
    fn test_write_metadata_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("metadata.json");

        let err = write_metadata(&path, "rust", "1").unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
    }
}
