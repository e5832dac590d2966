// SDK perf bench - Library root

pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod manifest;
pub mod report;
pub mod runner;
pub mod stats;
pub mod user;

#[cfg(feature = "statsig")]
pub mod statsig_client;

pub use client::FlagClient;
pub use error::{BenchError, Result};
pub use manifest::{SpecCategory, SpecNames};
pub use report::{BenchmarkResult, ResultsReport};
pub use runner::{BenchmarkRunner, RunnerSettings};
pub use stats::LatencyStats;
pub use user::SyntheticUser;
