use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Statsig SDK benchmark harness
pub const UNKNOWN_SDK_VERSION: &str = "unknown";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory shared with the mock server (manifest in, results out)
    #[arg(long, env = "SHARED_DIR", default_value = "/shared-volume")]
    pub shared_dir: PathBuf,

    /// Base URL of the mock scrapi server
    #[arg(long, env = "SCRAPI_URL", default_value = "http://scrapi:8000")]
    pub scrapi_url: String,

    /// Server secret handed to the SDK
    #[arg(short = 'k', long, env = "STATSIG_SDK_KEY", default_value = "secret-RUST_CORE")]
    pub sdk_key: String,

    /// SDK type reported in results
    #[arg(long, env = "SDK_TYPE", default_value = "statsig-server-core-rust")]
    pub sdk_type: String,

    /// Override for the SDK version reported in results (defaults to the linked SDK)
    #[arg(long, env = "STATSIG_SDK_VERSION")]
    pub sdk_version: Option<String>,

    /// Iterations for per-entity benchmarks
    #[arg(long, env = "ITER_HEAVY", default_value = "10000")]
    pub iter_heavy: usize,

    /// Iterations for client initialize response benchmarks
    #[arg(long, env = "ITER_LITE", default_value = "1000")]
    pub iter_lite: usize,

    /// How many times to look for the manifest before giving up
    #[arg(long, env = "MANIFEST_POLL_ATTEMPTS", default_value = "10")]
    pub poll_attempts: u32,

    /// Delay between manifest lookups in milliseconds
    #[arg(long, env = "MANIFEST_POLL_INTERVAL_MS", default_value = "1000")]
    pub poll_interval_ms: u64,

    /// Pause after each benchmark segment in milliseconds
    #[arg(long, env = "SEGMENT_PAUSE_MS", default_value = "1")]
    pub segment_pause_ms: u64,

    /// SDK shutdown timeout in seconds
    #[arg(long, env = "SHUTDOWN_TIMEOUT_SECS", default_value = "10")]
    pub shutdown_timeout_secs: u64,

    /// Where to write {sdk_type, sdk_version} before the run
    #[arg(long, env = "BENCH_METADATA_FILE")]
    pub metadata_file: Option<PathBuf>,

    /// CI marker; "1" or "true" reports results as SDK events
    #[arg(long, env = "CI")]
    pub ci: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    // Shared volume
    pub shared_dir: PathBuf,
    pub metadata_file: Option<PathBuf>,

    // SDK wiring
    pub scrapi_url: String,
    pub sdk_key: String,
    pub sdk_type: String,
    pub sdk_version: String,
    pub shutdown_timeout: Duration,

    // Sweep shape
    pub iter_heavy: usize,
    pub iter_lite: usize,
    pub segment_pause: Duration,

    // Manifest polling
    pub poll_attempts: u32,
    pub poll_interval: Duration,

    pub ci: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shared_dir: PathBuf::from("/shared-volume"),
            metadata_file: None,
            scrapi_url: "http://scrapi:8000".to_string(),
            sdk_key: "secret-RUST_CORE".to_string(),
            sdk_type: "statsig-server-core-rust".to_string(),
            sdk_version: linked_sdk_version().to_string(),
            shutdown_timeout: Duration::from_secs(10),
            iter_heavy: 10_000,
            iter_lite: 1_000,
            segment_pause: Duration::from_millis(1),
            poll_attempts: 10,
            poll_interval: Duration::from_secs(1),
            ci: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI > ENV > .env > defaults
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::from_args(CliArgs::parse()))
    }

    pub fn from_args(args: CliArgs) -> Self {
        Config {
            shared_dir: args.shared_dir,
            metadata_file: args.metadata_file,
            scrapi_url: args.scrapi_url.trim_end_matches('/').to_string(),
            sdk_key: args.sdk_key,
            sdk_type: args.sdk_type,
            sdk_version: args
                .sdk_version
                .unwrap_or_else(|| linked_sdk_version().to_string()),
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout_secs),
            iter_heavy: args.iter_heavy,
            iter_lite: args.iter_lite,
            segment_pause: Duration::from_millis(args.segment_pause_ms),
            poll_attempts: args.poll_attempts,
            poll_interval: Duration::from_millis(args.poll_interval_ms),
            ci: parse_ci_flag(args.ci.as_deref().unwrap_or_default()),
            log_level: args.log_level,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.iter_heavy == 0 || self.iter_lite == 0 {
            anyhow::bail!("Iteration counts must be positive");
        }
        if self.poll_attempts == 0 {
            anyhow::bail!("MANIFEST_POLL_ATTEMPTS must be at least 1");
        }
        Ok(())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.shared_dir.join("spec_names.json")
    }

    pub fn specs_url(&self) -> String {
        format!("{}/v2/download_config_specs", self.scrapi_url)
    }

    pub fn log_event_url(&self) -> String {
        format!("{}/v1/log_event", self.scrapi_url)
    }
}

/// Version of the SDK compiled into this build, from Cargo.lock
pub fn linked_sdk_version() -> &'static str {
    #[cfg(feature = "statsig")]
    {
        crate::statsig_client::sdk_version()
    }
    #[cfg(not(feature = "statsig"))]
    {
        UNKNOWN_SDK_VERSION
    }
}

/// CI providers set CI to "true"; some local scripts use "1"
fn parse_ci_flag(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true")
}
