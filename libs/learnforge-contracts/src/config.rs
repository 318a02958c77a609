// Effective executor limits
// Defaults come from constants::execution_limits; deployments override them
// through a JSON file and/or LEARNFORGE_* environment variables.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::constants::execution_limits;

pub const ENV_TIMEOUT_MS: &str = "LEARNFORGE_TIMEOUT_MS";
pub const ENV_MAX_TIMEOUT_MS: &str = "LEARNFORGE_MAX_TIMEOUT_MS";
pub const ENV_MAX_MEMORY_MB: &str = "LEARNFORGE_MAX_MEMORY_MB";
pub const ENV_MAX_CODE_LENGTH: &str = "LEARNFORGE_MAX_CODE_LENGTH";
pub const ENV_MAX_OUTPUT_LENGTH: &str = "LEARNFORGE_MAX_OUTPUT_LENGTH";
pub const ENV_MAX_CONCURRENT_EXECUTIONS: &str = "LEARNFORGE_MAX_CONCURRENT_EXECUTIONS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("invalid limits: {0}")]
    Invalid(String),
}

/// Limits the executor enforces on every run.
///
/// Serialized with the same SCREAMING_SNAKE_CASE keys as the shared
/// `EXECUTION_LIMITS` constant group. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ExecutionLimits {
    pub timeout_ms: u64,
    pub max_timeout_ms: u64,
    pub max_memory_mb: u32,
    pub max_code_length: usize,
    pub max_output_length: usize,
    pub max_concurrent_executions: u32,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            timeout_ms: execution_limits::TIMEOUT_MS,
            max_timeout_ms: execution_limits::MAX_TIMEOUT_MS,
            max_memory_mb: execution_limits::MAX_MEMORY_MB,
            max_code_length: execution_limits::MAX_CODE_LENGTH,
            max_output_length: execution_limits::MAX_OUTPUT_LENGTH,
            max_concurrent_executions: execution_limits::MAX_CONCURRENT_EXECUTIONS,
        }
    }
}

impl ExecutionLimits {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Load limits from a JSON file. Partial files are allowed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let limits: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Loaded execution limits");
        limits.validate()?;
        Ok(limits)
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in production).
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_from(&lookup, ENV_TIMEOUT_MS, &mut self.timeout_ms)?;
        override_from(&lookup, ENV_MAX_TIMEOUT_MS, &mut self.max_timeout_ms)?;
        override_from(&lookup, ENV_MAX_MEMORY_MB, &mut self.max_memory_mb)?;
        override_from(&lookup, ENV_MAX_CODE_LENGTH, &mut self.max_code_length)?;
        override_from(&lookup, ENV_MAX_OUTPUT_LENGTH, &mut self.max_output_length)?;
        override_from(
            &lookup,
            ENV_MAX_CONCURRENT_EXECUTIONS,
            &mut self.max_concurrent_executions,
        )?;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("TIMEOUT_MS must be positive".to_string()));
        }
        if self.timeout_ms > self.max_timeout_ms {
            return Err(ConfigError::Invalid(format!(
                "TIMEOUT_MS ({}) exceeds MAX_TIMEOUT_MS ({})",
                self.timeout_ms, self.max_timeout_ms
            )));
        }
        if self.max_code_length == 0 {
            return Err(ConfigError::Invalid("MAX_CODE_LENGTH must be positive".to_string()));
        }
        if self.max_output_length == 0 {
            return Err(ConfigError::Invalid(
                "MAX_OUTPUT_LENGTH must be positive".to_string(),
            ));
        }
        if self.max_concurrent_executions == 0 {
            return Err(ConfigError::Invalid(
                "MAX_CONCURRENT_EXECUTIONS must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective timeout for a request: its own value or the default,
    /// capped at `max_timeout_ms`.
    pub fn clamp_timeout(&self, requested: Option<u64>) -> u64 {
        requested
            .filter(|ms| *ms > 0)
            .unwrap_or(self.timeout_ms)
            .min(self.max_timeout_ms)
    }

    /// Cut output to `max_output_length` bytes without splitting a char.
    pub fn truncate_output<'a>(&self, output: &'a str) -> &'a str {
        if output.len() <= self.max_output_length {
            return output;
        }
        let mut end = self.max_output_length;
        while !output.is_char_boundary(end) {
            end -= 1;
        }
        &output[..end]
    }

    pub fn max_memory_bytes(&self) -> u64 {
        u64::from(self.max_memory_mb) * 1024 * 1024
    }
}

fn override_from<F, T>(lookup: &F, name: &'static str, slot: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(name) {
        let parsed = raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnv {
            name,
            value: raw.clone(),
        })?;
        debug!(name, value = %raw.trim(), "Execution limit overridden");
        *slot = parsed;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_constants() {
        let limits = ExecutionLimits::default();
        assert_eq!(limits.timeout_ms, 5000);
        assert_eq!(limits.max_memory_mb, 128);
        assert_eq!(limits.max_code_length, 50_000);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_overrides_applied() {
        let limits = ExecutionLimits::default()
            .with_overrides_from(lookup(&[
                (ENV_TIMEOUT_MS, "2000"),
                (ENV_MAX_MEMORY_MB, " 256 "),
            ]))
            .unwrap();

        assert_eq!(limits.timeout_ms, 2000);
        assert_eq!(limits.max_memory_mb, 256);
        assert_eq!(limits.max_output_length, 10_000);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = ExecutionLimits::default()
            .with_overrides_from(lookup(&[(ENV_MAX_CODE_LENGTH, "lots")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_MAX_CODE_LENGTH, .. }));
    }

    #[test]
    fn test_inconsistent_limits_rejected() {
        let err = ExecutionLimits::default()
            .with_overrides_from(lookup(&[(ENV_TIMEOUT_MS, "60000")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let err = ExecutionLimits::default()
            .with_overrides_from(lookup(&[(ENV_MAX_CODE_LENGTH, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("MAX_CODE_LENGTH")));

        let limits = ExecutionLimits {
            max_output_length: 0,
            ..ExecutionLimits::default()
        };
        assert!(matches!(limits.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let limits: ExecutionLimits = serde_json::from_str(r#"{ "MAX_MEMORY_MB": 64 }"#).unwrap();
        assert_eq!(limits.max_memory_mb, 64);
        assert_eq!(limits.timeout_ms, 5000);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ExecutionLimits::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_clamp_timeout() {
        let limits = ExecutionLimits::default();
        assert_eq!(limits.clamp_timeout(None), 5000);
        assert_eq!(limits.clamp_timeout(Some(0)), 5000);
        assert_eq!(limits.clamp_timeout(Some(1200)), 1200);
        assert_eq!(limits.clamp_timeout(Some(90_000)), 30_000);
    }

    #[test]
    fn test_truncate_output() {
        let limits = ExecutionLimits {
            max_output_length: 4,
            ..ExecutionLimits::default()
        };

        assert_eq!(limits.truncate_output("abc"), "abc");
        assert_eq!(limits.truncate_output("abcdef"), "abcd");
        // 'é' is two bytes; cutting at 4 would split it
        assert_eq!(limits.truncate_output("abcé"), "abc");
    }

    #[test]
    fn test_memory_bytes() {
        assert_eq!(ExecutionLimits::default().max_memory_bytes(), 128 * 1024 * 1024);
    }
}
