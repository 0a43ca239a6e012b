//! Driver configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default per-implementation verification budget, in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 20;

/// Configuration for a verification driver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Verification budget handed to the verifier (default: 20 seconds).
    /// The driver does not enforce it itself; the verifier reports a
    /// timed-out outcome when it is exhausted.
    pub timeout: Duration,

    /// Path to the frontend executable (looked up on PATH if None).
    pub frontend_path: Option<PathBuf>,

    /// Path to the verifier executable (looked up on PATH if None).
    pub verifier_path: Option<PathBuf>,

    /// Implementation to verify (first in the program if None).
    pub implementation: Option<String>,

    /// Extra arguments passed through to the verifier.
    pub extra_args: Vec<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
            frontend_path: None,
            verifier_path: None,
            implementation: None,
            extra_args: Vec::new(),
        }
    }
}

impl DriverConfig {
    /// Frontend executable to invoke.
    #[must_use]
    pub fn frontend_exe(&self) -> PathBuf {
        self.frontend_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("symtrace-frontend"))
    }

    /// Verifier executable to invoke.
    #[must_use]
    pub fn verifier_exe(&self) -> PathBuf {
        self.verifier_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("symtrace-verifier"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_config_default() {
        let config = DriverConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert!(config.frontend_path.is_none());
        assert!(config.verifier_path.is_none());
        assert!(config.implementation.is_none());
        assert!(config.extra_args.is_empty());
    }

    #[test]
    fn test_executable_defaults_and_overrides() {
        let config = DriverConfig::default();
        assert_eq!(config.frontend_exe(), PathBuf::from("symtrace-frontend"));
        assert_eq!(config.verifier_exe(), PathBuf::from("symtrace-verifier"));

        let config = DriverConfig {
            verifier_path: Some(PathBuf::from("/opt/bin/boogie")),
            ..Default::default()
        };
        assert_eq!(config.verifier_exe(), PathBuf::from("/opt/bin/boogie"));
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = DriverConfig {
            implementation: Some("Main".to_string()),
            extra_args: vec!["--trace".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: DriverConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.implementation.as_deref(), Some("Main"));
        assert_eq!(back.extra_args, vec!["--trace"]);
    }
}
