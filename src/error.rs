// Error handling module
// Defines the failures that end a benchmark run

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the benchmark sweep
#[derive(Error, Debug)]
pub enum BenchError {
    /// The spec names manifest never appeared
    #[error("Manifest not found at {} after {attempts} attempts", path.display())]
    ManifestNotFound { path: PathBuf, attempts: u32 },

    /// The manifest exists but is not valid JSON for the expected shape
    #[error("Malformed manifest: {0}")]
    ManifestParse(#[source] serde_json::Error),

    /// Filesystem error while reading or writing
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SDK failed to initialize against the mock server
    #[error("SDK initialization failed: {0}")]
    SdkInit(String),

    /// An SDK accessor failed during a timed iteration
    #[error("SDK call {operation} failed: {message}")]
    SdkCall { operation: String, message: String },

    /// Benchmark asked to run with zero iterations
    #[error("Cannot compute statistics for {0}: no samples")]
    EmptySample(String),

    /// Results could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BenchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn sdk_call(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        BenchError::SdkCall {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_not_found_message() {
        let err = BenchError::ManifestNotFound {
            path: PathBuf::from("/shared-volume/spec_names.json"),
            attempts: 10,
        };
        assert_eq!(
            err.to_string(),
            "Manifest not found at /shared-volume/spec_names.json after 10 attempts"
        );
    }

    #[test]
    fn test_sdk_errors() {
        let err = BenchError::SdkInit("connection refused".to_string());
        assert_eq!(err.to_string(), "SDK initialization failed: connection refused");

        let err = BenchError::sdk_call("check_gate", "boom");
        assert_eq!(err.to_string(), "SDK call check_gate failed: boom");
    }

    #[test]
    fn test_io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = BenchError::io("/tmp/out.json", source);
        assert!(err.to_string().starts_with("I/O error on /tmp/out.json"));
    }

    #[test]
    fn test_empty_sample_message() {
        let err = BenchError::EmptySample("get_layer".to_string());
        assert_eq!(
            err.to_string(),
            "Cannot compute statistics for get_layer: no samples"
        );
    }
}
