//! The SDK surface the harness drives.
//!
//! Evaluation, rule matching and network sync all live inside the SDK. The
//! harness only needs to call each accessor and know when it failed.

use std::time::Duration;

use crate::error::Result;
use crate::report::BenchmarkResult;
use crate::user::SyntheticUser;

/// A feature-flagging SDK client under benchmark.
///
/// Accessors are synchronous from the harness' point of view. Any async work
/// an SDK does internally must be finished before the accessor returns, or the
/// timer would stop early.
#[allow(async_fn_in_trait)]
pub trait FlagClient {
    /// The SDK's own user type
    type User;

    /// Convert a synthetic user into the SDK's representation
    fn create_user(&self, user: &SyntheticUser) -> Self::User;

    /// Fetch specs from the server and get ready to evaluate
    async fn initialize(&self) -> Result<()>;

    /// Flush pending events and stop background work
    async fn shutdown(&self, timeout: Duration) -> Result<()>;

    fn check_gate(&self, user: &Self::User, gate: &str) -> Result<bool>;

    fn get_feature_gate(&self, user: &Self::User, gate: &str) -> Result<()>;

    fn get_dynamic_config(&self, user: &Self::User, config: &str) -> Result<()>;

    fn get_experiment(&self, user: &Self::User, experiment: &str) -> Result<()>;

    fn get_layer(&self, user: &Self::User, layer: &str) -> Result<()>;

    /// Evaluate everything for a user in the client bootstrap format
    fn get_client_initialize_response(&self, user: &Self::User) -> Result<()>;

    /// Report a finished benchmark back through the SDK's event pipeline
    fn log_benchmark(&self, user: &Self::User, result: &BenchmarkResult) -> Result<()>;
}
