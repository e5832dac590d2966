//! `FlagClient` backed by the Statsig Rust server core.

use serde_json::{Map, Value};
use statsig_rust::statsig_user::StatsigUserBuilder;
use statsig_rust::{DynamicValue, Statsig, StatsigOptions, StatsigUser};
use std::collections::HashMap;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use crate::client::FlagClient;
use crate::config::Config;
use crate::error::{BenchError, Result};
use crate::report::BenchmarkResult;
use crate::user::SyntheticUser;

const BENCHMARK_EVENT: &str = "sdk_benchmark";
const SDK_CRATE: &str = "statsig-rust";

#[allow(dead_code)]
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// statsig-rust version resolved in Cargo.lock at build time
pub fn sdk_version() -> &'static str {
    built_info::DEPENDENCIES
        .iter()
        .find(|(name, _)| *name == SDK_CRATE)
        .map(|(_, version)| *version)
        .unwrap_or(crate::config::UNKNOWN_SDK_VERSION)
}

pub struct StatsigClient {
    statsig: Statsig,
}

impl StatsigClient {
    /// Point the SDK at the mock server's download and logging endpoints
    pub fn new(config: &Config) -> Self {
        let options = StatsigOptions {
            specs_url: Some(config.specs_url()),
            log_event_url: Some(config.log_event_url()),
            ..StatsigOptions::new()
        };

        Self {
            statsig: Statsig::new(&config.sdk_key, Some(Arc::new(options))),
        }
    }
}

fn dynamic_map(map: &Option<Map<String, Value>>) -> Option<HashMap<String, DynamicValue>> {
    map.as_ref().map(|map| {
        map.iter()
            .map(|(k, v)| (k.clone(), DynamicValue::from(v.clone())))
            .collect()
    })
}

impl FlagClient for StatsigClient {
    type User = StatsigUser;

    fn create_user(&self, user: &SyntheticUser) -> StatsigUser {
        StatsigUserBuilder::new_with_user_id(user.user_id.clone())
            .email(user.email.clone())
            .ip(user.ip.clone())
            .user_agent(user.user_agent.clone())
            .country(user.country.clone())
            .locale(user.locale.clone())
            .app_version(user.app_version.clone())
            .custom(dynamic_map(&user.custom))
            .private_attributes(dynamic_map(&user.private_attributes))
            .build()
    }

    async fn initialize(&self) -> Result<()> {
        self.statsig
            .initialize()
            .await
            .map_err(|e| BenchError::SdkInit(format!("{:?}", e)))
    }

    async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.statsig
            .shutdown_with_timeout(timeout)
            .await
            .map_err(|e| BenchError::sdk_call("shutdown", format!("{:?}", e)))
    }

    fn check_gate(&self, user: &StatsigUser, gate: &str) -> Result<bool> {
        Ok(self.statsig.check_gate(user, gate))
    }

    fn get_feature_gate(&self, user: &StatsigUser, gate: &str) -> Result<()> {
        black_box(self.statsig.get_feature_gate(user, gate));
        Ok(())
    }

    fn get_dynamic_config(&self, user: &StatsigUser, config: &str) -> Result<()> {
        black_box(self.statsig.get_dynamic_config(user, config));
        Ok(())
    }

    fn get_experiment(&self, user: &StatsigUser, experiment: &str) -> Result<()> {
        black_box(self.statsig.get_experiment(user, experiment));
        Ok(())
    }

    fn get_layer(&self, user: &StatsigUser, layer: &str) -> Result<()> {
        black_box(self.statsig.get_layer(user, layer));
        Ok(())
    }

    fn get_client_initialize_response(&self, user: &StatsigUser) -> Result<()> {
        black_box(self.statsig.get_client_init_response(user));
        Ok(())
    }

    fn log_benchmark(&self, user: &StatsigUser, result: &BenchmarkResult) -> Result<()> {
        self.statsig.log_event_with_number(
            user,
            BENCHMARK_EVENT,
            Some(result.p99),
            Some(HashMap::from([
                ("benchmarkName".to_string(), result.benchmark_name.clone()),
                ("specName".to_string(), result.spec_name.clone()),
                ("sdkType".to_string(), result.sdk_type.clone()),
                ("sdkVersion".to_string(), result.sdk_version.clone()),
            ])),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_map_keeps_every_attribute() {
        let user = SyntheticUser::with_id("abc");

        let custom = dynamic_map(&user.custom).unwrap();
        assert_eq!(custom.len(), 1);
        assert!(custom.contains_key("isAdmin"));

        let private = dynamic_map(&user.private_attributes).unwrap();
        assert!(private.contains_key("isPaid"));

        assert!(dynamic_map(&SyntheticUser::global().custom).is_none());
    }

    #[test]
    fn test_sdk_version_from_lockfile() {
        assert_ne!(sdk_version(), crate::config::UNKNOWN_SDK_VERSION);
    }
}
