//! EventSink implementations.

use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::domain::PruneEvent;
use crate::ports::EventSink;

/// Forwards events to `tracing`. Failures are `warn`, lifecycle is `info`,
/// everything per-tick is `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: PruneEvent) {
        match &event {
            PruneEvent::Started {
                pruner, interval, ..
            } => info!(%pruner, %interval, "pruner started"),
            PruneEvent::Stopped {
                pruner, discarded, ..
            } => info!(%pruner, discarded, "pruner stopped"),
            PruneEvent::ScheduleReleased { pruner, .. } => {
                info!(%pruner, "every target released; pruning schedule dropped")
            }
            PruneEvent::TargetFailed {
                pruner,
                pass,
                index,
                target,
                error,
                ..
            } => warn!(%pruner, %pass, index, cache = %target, error = %error, "target prune failed"),
            PruneEvent::PassCompleted {
                pruner,
                pass,
                pruned,
                failed,
                released,
                ..
            } => debug!(%pruner, %pass, pruned, failed, released, "prune pass completed"),
            other => debug!(pruner = %other.pruner(), kind = other.kind(), "prune event"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: PruneEvent) {}
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<PruneEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PruneEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Kinds only, handy for asserting on sequences.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(PruneEvent::kind).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: PruneEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PrunerId;
    use chrono::Utc;
    use tracing_test::traced_test;
    use ulid::Ulid;

    fn skipped() -> PruneEvent {
        PruneEvent::TickSkipped {
            pruner: PrunerId::from_ulid(Ulid::new()),
            at: Utc::now(),
        }
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingEventSink::new();
        let pruner = PrunerId::from_ulid(Ulid::new());
        sink.emit(skipped());
        sink.emit(PruneEvent::Stopped {
            pruner,
            discarded: 0,
            at: Utc::now(),
        });

        assert_eq!(sink.kinds(), vec!["tick_skipped", "stopped"]);
        assert_eq!(sink.events()[1].pruner(), pruner);
    }

    #[test]
    #[traced_test]
    fn tracing_sink_logs_failures_as_warnings() {
        TracingEventSink.emit(PruneEvent::TargetFailed {
            pruner: PrunerId::from_ulid(Ulid::new()),
            pass: Ulid::new().into(),
            index: 1,
            target: "sessions".into(),
            error: "prune failed: disk full".into(),
            at: Utc::now(),
        });

        assert!(logs_contain("target prune failed"));
        assert!(logs_contain("disk full"));
    }
}
