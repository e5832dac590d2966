use anyhow::{Context, Result};

use sdk_perf_bench::config::Config;
use sdk_perf_bench::harness;
use sdk_perf_bench::statsig_client::StatsigClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("🚀 SDK perf bench starting...");
    tracing::info!(
        "Target: {} {} via {}",
        config.sdk_type,
        config.sdk_version,
        config.scrapi_url
    );
    tracing::debug!(
        iter_heavy = config.iter_heavy,
        iter_lite = config.iter_lite,
        ci = config.ci,
        "Sweep settings"
    );

    let client = StatsigClient::new(&config);
    let outcome = harness::run(&config, &client)
        .await
        .context("Benchmark run did not complete")?;

    outcome.report.print_summary();
    println!("Results: {}", outcome.path.display());
    println!("\n\n");

    Ok(())
}
