use crate::history::DEFAULT_HISTORY_LIMIT;
use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_STEP_DELAY_MS: u64 = 500;

const STEP_DELAY_VAR: &str = "WORKFLOW_STEP_DELAY_MS";
const HISTORY_LIMIT_VAR: &str = "WORKFLOW_HISTORY_LIMIT";
const CONTINUE_ON_ERROR_VAR: &str = "WORKFLOW_CONTINUE_ON_ERROR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Pause per node while animating a run.
    pub step_delay_ms: u64,
    /// Maximum number of retained undo snapshots.
    pub history_limit: usize,
    /// Keep visiting after a node ends in `error` instead of stopping.
    pub continue_on_error: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            continue_on_error: false,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `WORKFLOW_*` environment variables.
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(STEP_DELAY_VAR) {
            config.step_delay_ms = raw
                .trim()
                .parse()
                .with_context(|| {
                    format!(
                        "{} must be a number of milliseconds, got '{}'",
                        STEP_DELAY_VAR, raw
                    )
                })?;
        }
        if let Some(raw) = lookup(HISTORY_LIMIT_VAR) {
            config.history_limit = raw
                .trim()
                .parse()
                .with_context(|| {
                    format!(
                        "{} must be a positive integer, got '{}'",
                        HISTORY_LIMIT_VAR, raw
                    )
                })?;
        }
        if let Some(raw) = lookup(CONTINUE_ON_ERROR_VAR) {
            config.continue_on_error = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => anyhow::bail!("{} must be a boolean, got '{}'", CONTINUE_ON_ERROR_VAR, raw),
            };
        }

        Ok(config)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.step_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_env_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("WORKFLOW_STEP_DELAY_MS", "20"),
            ("WORKFLOW_HISTORY_LIMIT", "16"),
            ("WORKFLOW_CONTINUE_ON_ERROR", "true"),
        ]))
        .unwrap();
        assert_eq!(config.step_delay_ms, 20);
        assert_eq!(config.history_limit, 16);
        assert!(config.continue_on_error);
    }

    #[test]
    fn test_bad_values_are_reported() {
        let err = EngineConfig::from_lookup(lookup(&[("WORKFLOW_STEP_DELAY_MS", "fast")]))
            .unwrap_err();
        assert!(err.to_string().contains("WORKFLOW_STEP_DELAY_MS"));

        assert!(EngineConfig::from_lookup(lookup(&[("WORKFLOW_CONTINUE_ON_ERROR", "maybe")]))
            .is_err());
    }
}
