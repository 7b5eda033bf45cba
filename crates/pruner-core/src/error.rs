//! Errors - エラー型と分類
//!
//! - `PrunerError`: lifecycle misuse and resource errors surfaced by `Pruner::start`
//! - `SchedulerError`: the recurring-tick resource could not be created
//! - `PruneError`: a single target failed (isolated, never aborts a pass)
//! - `SettingsError`: configuration could not be parsed or validated

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrunerError {
    /// `start` was called after `stop`; a stopped pruner cannot be restarted.
    #[error("pruner has been stopped and cannot accept new targets")]
    Stopped,

    #[error("failed to schedule pruning: {0}")]
    Scheduler(#[from] SchedulerError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("no tokio runtime is available to host the pruning schedule")]
    NoRuntime,

    #[error("scheduler rejected the registration: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PruneError {
    #[error("prune failed: {0}")]
    Failed(String),

    #[error("prune panicked: {0}")]
    Panicked(String),
}

impl PruneError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("pruning interval must be at least 1ms, got {0:?}")]
    IntervalTooShort(std::time::Duration),

    #[error("unknown pruning interval keyword '{0}' (expected milliseconds or \"never\")")]
    UnknownKeyword(String),

    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_error_converts_into_pruner_error() {
        let err: PrunerError = SchedulerError::NoRuntime.into();
        assert!(matches!(err, PrunerError::Scheduler(SchedulerError::NoRuntime)));
        assert!(err.to_string().contains("tokio runtime"));
    }

    #[test]
    fn prune_error_messages_name_the_cause() {
        assert_eq!(PruneError::failed("disk full").to_string(), "prune failed: disk full");
        assert_eq!(
            PruneError::Panicked("boom".into()).to_string(),
            "prune panicked: boom"
        );
    }
}
