//! Settings - 設定
//!
//! A single process-wide knob: the cache pruning interval. A pruner reads it
//! once, when its first `start` creates the schedule.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::interval::PruneInterval;
use crate::error::SettingsError;

/// # 使用例
/// ```ignore
/// let settings = PrunerSettings::from_json_str(r#"{ "cache_pruning_interval": 5000 }"#)?;
/// let pruner = PrunerBuilder::new().settings(settings).build();
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrunerSettings {
    pub cache_pruning_interval: PruneInterval,
}

impl PrunerSettings {
    pub fn new(cache_pruning_interval: PruneInterval) -> Self {
        Self {
            cache_pruning_interval,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let settings = PrunerSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, PrunerSettings::default());
    }

    #[test]
    fn parses_explicit_interval() {
        let settings =
            PrunerSettings::from_json_str(r#"{ "cache_pruning_interval": 1500 }"#).unwrap();
        assert_eq!(
            settings.cache_pruning_interval,
            PruneInterval::from_millis(1500).unwrap()
        );
    }

    #[test]
    fn zero_interval_surfaces_as_json_error() {
        let err = PrunerSettings::from_json_str(r#"{ "cache_pruning_interval": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
        assert!(err.to_string().contains("at least 1ms"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PrunerSettings::from_json_str(r#"{ "interval": 10 }"#).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PrunerSettings::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
