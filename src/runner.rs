//! Benchmark runner: sweeps every manifest entity through each SDK accessor.

use std::time::Duration;

use crate::client::FlagClient;
use crate::config::Config;
use crate::error::Result;
use crate::manifest::{SpecCategory, SpecNames};
use crate::report::BenchmarkResult;
use crate::stats::measure;
use crate::user::SyntheticUser;

/// Spec name recorded for benchmarks that are not tied to one entity
pub const NO_SPEC: &str = "n/a";

/// SDK accessors that get timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    CheckGate,
    GetFeatureGate,
    GetDynamicConfig,
    GetExperiment,
    GetLayer,
    GetClientInitializeResponse,
}

impl Accessor {
    /// Accessors exercised for each entity of a category, in run order
    pub fn for_category(category: SpecCategory) -> &'static [Accessor] {
        match category {
            SpecCategory::FeatureGates => &[Accessor::CheckGate, Accessor::GetFeatureGate],
            SpecCategory::DynamicConfigs => &[Accessor::GetDynamicConfig],
            SpecCategory::Experiments => &[Accessor::GetExperiment],
            SpecCategory::Layers => &[Accessor::GetLayer],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Accessor::CheckGate => "check_gate",
            Accessor::GetFeatureGate => "get_feature_gate",
            Accessor::GetDynamicConfig => "get_dynamic_config",
            Accessor::GetExperiment => "get_experiment",
            Accessor::GetLayer => "get_layer",
            Accessor::GetClientInitializeResponse => "get_client_initialize_response",
        }
    }

    pub fn benchmark_name(&self, mode: UserMode) -> String {
        match mode {
            UserMode::Fresh => self.name().to_string(),
            UserMode::Global => format!("{}_global_user", self.name()),
        }
    }

    fn invoke<C: FlagClient>(&self, client: &C, user: &C::User, spec: &str) -> Result<()> {
        match self {
            Accessor::CheckGate => client.check_gate(user, spec).map(|_| ()),
            Accessor::GetFeatureGate => client.get_feature_gate(user, spec),
            Accessor::GetDynamicConfig => client.get_dynamic_config(user, spec),
            Accessor::GetExperiment => client.get_experiment(user, spec),
            Accessor::GetLayer => client.get_layer(user, spec),
            Accessor::GetClientInitializeResponse => client.get_client_initialize_response(user),
        }
    }
}

/// Which user a segment evaluates against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMode {
    /// A new random user built inside every timed call
    Fresh,
    /// The shared global user
    Global,
}

/// Knobs for a sweep
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub iter_heavy: usize,
    pub iter_lite: usize,
    pub segment_pause: Duration,
    pub sdk_type: String,
    pub sdk_version: String,
}

impl From<&Config> for RunnerSettings {
    fn from(config: &Config) -> Self {
        Self {
            iter_heavy: config.iter_heavy,
            iter_lite: config.iter_lite,
            segment_pause: config.segment_pause,
            sdk_type: config.sdk_type.clone(),
            sdk_version: config.sdk_version.clone(),
        }
    }
}

/// Benchmark runner that times SDK accessors
pub struct BenchmarkRunner<'a, C: FlagClient> {
    client: &'a C,
    settings: RunnerSettings,
    global_user: C::User,
    results: Vec<BenchmarkResult>,
}

impl<'a, C: FlagClient> BenchmarkRunner<'a, C> {
    pub fn new(client: &'a C, settings: RunnerSettings) -> Self {
        let global_user = client.create_user(&SyntheticUser::global());
        Self {
            client,
            settings,
            global_user,
            results: Vec::new(),
        }
    }

    /// Run the full sweep and return results in call order
    pub async fn run(mut self, names: &SpecNames) -> Result<Vec<BenchmarkResult>> {
        for category in SpecCategory::ALL {
            let entities = names.names(category);
            tracing::debug!(%category, count = entities.len(), "Benchmarking category");

            for entity in entities {
                for &accessor in Accessor::for_category(category) {
                    for mode in [UserMode::Fresh, UserMode::Global] {
                        self.bench(accessor, mode, entity, self.settings.iter_heavy)
                            .await?;
                    }
                }
            }
        }

        for mode in [UserMode::Fresh, UserMode::Global] {
            self.bench(
                Accessor::GetClientInitializeResponse,
                mode,
                NO_SPEC,
                self.settings.iter_lite,
            )
            .await?;
        }

        Ok(self.results)
    }

    async fn bench(
        &mut self,
        accessor: Accessor,
        mode: UserMode,
        spec: &str,
        iterations: usize,
    ) -> Result<()> {
        let name = accessor.benchmark_name(mode);
        let client = self.client;

        let stats = match mode {
            UserMode::Fresh => measure(&name, iterations, || {
                let user = client.create_user(&SyntheticUser::random());
                accessor.invoke(client, &user, spec)
            })?,
            UserMode::Global => {
                let user = &self.global_user;
                measure(&name, iterations, || accessor.invoke(client, user, spec))?
            }
        };

        let result = BenchmarkResult::new(
            name,
            spec,
            &stats,
            self.settings.sdk_type.as_str(),
            self.settings.sdk_version.as_str(),
        );
        println!("{}", result.console_line());
        self.results.push(result);

        tokio::time::sleep(self.settings.segment_pause).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use std::cell::RefCell;

    /// Counts calls per accessor; fails `get_layer` on demand
    #[derive(Default)]
    struct CountingClient {
        calls: RefCell<Vec<(String, String)>>,
        fail_layers: bool,
    }

    impl CountingClient {
        fn record(&self, op: &str, user: &SyntheticUser, spec: &str) {
            self.calls
                .borrow_mut()
                .push((op.to_string(), format!("{}:{}", user.user_id, spec)));
        }

        fn count(&self, op: &str) -> usize {
            self.calls.borrow().iter().filter(|(o, _)| o == op).count()
        }
    }

    impl FlagClient for CountingClient {
        type User = SyntheticUser;

        fn create_user(&self, user: &SyntheticUser) -> SyntheticUser {
            user.clone()
        }

        async fn initialize(&self) -> Result<()> {
            Ok(())
        }

        async fn shutdown(&self, _timeout: Duration) -> Result<()> {
            Ok(())
        }

        fn check_gate(&self, user: &SyntheticUser, gate: &str) -> Result<bool> {
            self.record("check_gate", user, gate);
            Ok(true)
        }

        fn get_feature_gate(&self, user: &SyntheticUser, gate: &str) -> Result<()> {
            self.record("get_feature_gate", user, gate);
            Ok(())
        }

        fn get_dynamic_config(&self, user: &SyntheticUser, config: &str) -> Result<()> {
            self.record("get_dynamic_config", user, config);
            Ok(())
        }

        fn get_experiment(&self, user: &SyntheticUser, experiment: &str) -> Result<()> {
            self.record("get_experiment", user, experiment);
            Ok(())
        }

        fn get_layer(&self, user: &SyntheticUser, layer: &str) -> Result<()> {
            self.record("get_layer", user, layer);
            if self.fail_layers {
                return Err(BenchError::sdk_call("get_layer", "layer store unavailable"));
            }
            Ok(())
        }

        fn get_client_initialize_response(&self, user: &SyntheticUser) -> Result<()> {
            self.record("gcir", user, "");
            Ok(())
        }

        fn log_benchmark(&self, _user: &SyntheticUser, _result: &BenchmarkResult) -> Result<()> {
            Ok(())
        }
    }

    fn settings() -> RunnerSettings {
        RunnerSettings {
            iter_heavy: 20,
            iter_lite: 3,
            segment_pause: Duration::ZERO,
            sdk_type: "test-sdk".to_string(),
            sdk_version: "9.9.9".to_string(),
        }
    }

    fn names(gates: &[&str], configs: &[&str], experiments: &[&str], layers: &[&str]) -> SpecNames {
        let own = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        SpecNames {
            feature_gates: own(gates),
            dynamic_configs: own(configs),
            experiments: own(experiments),
            layers: own(layers),
        }
    }

    #[test]
    fn test_benchmark_names() {
        assert_eq!(Accessor::CheckGate.benchmark_name(UserMode::Fresh), "check_gate");
        assert_eq!(
            Accessor::GetClientInitializeResponse.benchmark_name(UserMode::Global),
            "get_client_initialize_response_global_user"
        );
    }

    #[tokio::test]
    async fn test_empty_manifest_runs_only_client_init() {
        let client = CountingClient::default();
        let results = BenchmarkRunner::new(&client, settings())
            .run(&SpecNames::default())
            .await
            .unwrap();

        let got: Vec<&str> = results.iter().map(|r| r.benchmark_name.as_str()).collect();
        assert_eq!(
            got,
            [
                "get_client_initialize_response",
                "get_client_initialize_response_global_user"
            ]
        );
        assert!(results.iter().all(|r| r.spec_name == NO_SPEC));
        assert_eq!(client.count("gcir"), 6);
        assert_eq!(client.calls.borrow().len(), 6);
    }

    #[tokio::test]
    async fn test_single_gate_produces_four_results() {
        let client = CountingClient::default();
        let results = BenchmarkRunner::new(&client, settings())
            .run(&names(&["g1"], &[], &[], &[]))
            .await
            .unwrap();

        let gate_results: Vec<&BenchmarkResult> =
            results.iter().filter(|r| r.spec_name == "g1").collect();
        let got: Vec<&str> = gate_results
            .iter()
            .map(|r| r.benchmark_name.as_str())
            .collect();
        assert_eq!(
            got,
            [
                "check_gate",
                "check_gate_global_user",
                "get_feature_gate",
                "get_feature_gate_global_user"
            ]
        );
        assert_eq!(results.len(), 6);
        assert_eq!(client.count("check_gate"), 40);
        assert_eq!(client.count("get_feature_gate"), 40);
        assert!(results
            .iter()
            .all(|r| r.sdk_type == "test-sdk" && r.sdk_version == "9.9.9"));
    }

    #[tokio::test]
    async fn test_fresh_and_global_users() {
        let client = CountingClient::default();
        BenchmarkRunner::new(&client, settings())
            .run(&names(&[], &["c1"], &[], &[]))
            .await
            .unwrap();

        let calls = client.calls.borrow();
        let config_calls: Vec<&String> = calls
            .iter()
            .filter(|(op, _)| op == "get_dynamic_config")
            .map(|(_, target)| target)
            .collect();
        assert_eq!(config_calls.len(), 40);

        // first segment uses fresh users, second the global one
        let (fresh, global) = config_calls.split_at(20);
        assert!(fresh.iter().all(|t| !t.starts_with("global_user:")));
        assert!(global.iter().all(|t| *t == "global_user:c1"));
    }

    #[tokio::test]
    async fn test_category_order() {
        let client = CountingClient::default();
        let results = BenchmarkRunner::new(&client, settings())
            .run(&names(&["g"], &["c"], &["e"], &["l"]))
            .await
            .unwrap();

        let specs: Vec<&str> = results.iter().map(|r| r.spec_name.as_str()).collect();
        assert_eq!(
            specs,
            ["g", "g", "g", "g", "c", "c", "e", "e", "l", "l", NO_SPEC, NO_SPEC]
        );
    }

    #[tokio::test]
    async fn test_accessor_failure_aborts_run() {
        let client = CountingClient {
            fail_layers: true,
            ..Default::default()
        };
        let result = BenchmarkRunner::new(&client, settings())
            .run(&names(&["g"], &[], &[], &["l"]))
            .await;

        assert!(matches!(result, Err(BenchError::SdkCall { .. })));
        // aborted on the first layer call; client init never ran
        assert_eq!(client.count("get_layer"), 1);
        assert_eq!(client.count("gcir"), 0);
    }
}
