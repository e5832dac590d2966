//! Spec names manifest written by the mock server.
//!
//! The mock server publishes the entity names it serves into the shared
//! volume once it is up. The harness waits for that file before touching
//! the SDK.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BenchError, Result};

/// Entity categories, in sweep order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecCategory {
    FeatureGates,
    DynamicConfigs,
    Experiments,
    Layers,
}

impl SpecCategory {
    pub const ALL: [SpecCategory; 4] = [
        SpecCategory::FeatureGates,
        SpecCategory::DynamicConfigs,
        SpecCategory::Experiments,
        SpecCategory::Layers,
    ];
}

impl std::fmt::Display for SpecCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecCategory::FeatureGates => write!(f, "feature_gates"),
            SpecCategory::DynamicConfigs => write!(f, "dynamic_configs"),
            SpecCategory::Experiments => write!(f, "experiments"),
            SpecCategory::Layers => write!(f, "layers"),
        }
    }
}

/// Entity names to benchmark, keyed by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SpecNames {
    #[serde(default)]
    pub feature_gates: Vec<String>,
    #[serde(default)]
    pub dynamic_configs: Vec<String>,
    #[serde(default)]
    pub experiments: Vec<String>,
    #[serde(default)]
    pub layers: Vec<String>,
}

impl SpecNames {
    pub fn names(&self, category: SpecCategory) -> &[String] {
        match category {
            SpecCategory::FeatureGates => &self.feature_gates,
            SpecCategory::DynamicConfigs => &self.dynamic_configs,
            SpecCategory::Experiments => &self.experiments,
            SpecCategory::Layers => &self.layers,
        }
    }

    pub fn total(&self) -> usize {
        SpecCategory::ALL.iter().map(|c| self.names(*c).len()).sum()
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(BenchError::ManifestParse)
    }
}

/// Polls the shared volume for the manifest and parses it once present
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    path: PathBuf,
    max_attempts: u32,
    interval: Duration,
}

impl ManifestLoader {
    pub fn new(path: impl Into<PathBuf>, max_attempts: u32, interval: Duration) -> Self {
        Self {
            path: path.into(),
            max_attempts,
            interval,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the manifest, then parse it
    pub async fn load(&self) -> Result<SpecNames> {
        let path = self.path.clone();
        let attempt = poll_until(self.max_attempts, self.interval, || path.exists()).await;

        let Some(attempt) = attempt else {
            tracing::error!(
                path = %self.path.display(),
                attempts = self.max_attempts,
                "Manifest never appeared"
            );
            return Err(BenchError::ManifestNotFound {
                path: self.path.clone(),
                attempts: self.max_attempts,
            });
        };
        tracing::info!(path = %self.path.display(), attempt, "Found spec names manifest");

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| BenchError::io(&self.path, e))?;
        let names = SpecNames::from_json(&raw)?;

        tracing::debug!(
            gates = names.feature_gates.len(),
            configs = names.dynamic_configs.len(),
            experiments = names.experiments.len(),
            layers = names.layers.len(),
            "Parsed manifest"
        );
        Ok(names)
    }
}

/// Run `probe` up to `max_attempts` times, sleeping `interval` between misses.
/// Returns the 1-based attempt that succeeded.
pub async fn poll_until<F>(max_attempts: u32, interval: Duration, mut probe: F) -> Option<u32>
where
    F: FnMut() -> bool,
{
    for attempt in 1..=max_attempts {
        if probe() {
            return Some(attempt);
        }
        tracing::debug!(attempt, max_attempts, "Manifest not ready yet");
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    None
}
