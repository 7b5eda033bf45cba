//! Events - ドメインイベント
//!
//! Everything observable about a pruner is emitted as a `PruneEvent` to the
//! configured `EventSink`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{PassId, PrunerId};
use super::interval::PruneInterval;

/// `index` is the target's position in the registry for that pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PruneEvent {
    Started {
        pruner: PrunerId,
        interval: PruneInterval,
        at: DateTime<Utc>,
    },
    /// The probe still reported alive; nothing was pruned.
    TickSkipped {
        pruner: PrunerId,
        at: DateTime<Utc>,
    },
    TargetPruned {
        pruner: PrunerId,
        pass: PassId,
        index: usize,
        target: String,
        at: DateTime<Utc>,
    },
    TargetFailed {
        pruner: PrunerId,
        pass: PassId,
        index: usize,
        target: String,
        error: String,
        at: DateTime<Utc>,
    },
    /// The owner dropped the target before the pass reached it.
    TargetReleased {
        pruner: PrunerId,
        pass: PassId,
        index: usize,
        at: DateTime<Utc>,
    },
    PassCompleted {
        pruner: PrunerId,
        pass: PassId,
        pruned: usize,
        failed: usize,
        released: usize,
        at: DateTime<Utc>,
    },
    /// Every registered target was released; the schedule is gone until the
    /// next `start`.
    ScheduleReleased {
        pruner: PrunerId,
        at: DateTime<Utc>,
    },
    Stopped {
        pruner: PrunerId,
        discarded: usize,
        at: DateTime<Utc>,
    },
}

impl PruneEvent {
    pub fn pruner(&self) -> PrunerId {
        match self {
            Self::Started { pruner, .. }
            | Self::TickSkipped { pruner, .. }
            | Self::TargetPruned { pruner, .. }
            | Self::TargetFailed { pruner, .. }
            | Self::TargetReleased { pruner, .. }
            | Self::PassCompleted { pruner, .. }
            | Self::ScheduleReleased { pruner, .. }
            | Self::Stopped { pruner, .. } => *pruner,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::TickSkipped { .. } => "tick_skipped",
            Self::TargetPruned { .. } => "target_pruned",
            Self::TargetFailed { .. } => "target_failed",
            Self::TargetReleased { .. } => "target_released",
            Self::PassCompleted { .. } => "pass_completed",
            Self::ScheduleReleased { .. } => "schedule_released",
            Self::Stopped { .. } => "stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn serialized_kind_matches_kind_name() {
        let event = PruneEvent::Stopped {
            pruner: PrunerId::from_ulid(Ulid::new()),
            discarded: 3,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["kind"], event.kind());
        assert_eq!(json["discarded"], 3);
    }
}
