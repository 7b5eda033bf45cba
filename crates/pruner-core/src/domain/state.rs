//! Pruner lifecycle phase.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a pruner.
///
/// State transitions:
/// - Uninitialized -> Running (first successful `start`)
/// - Running -> Idle (a pass found every target released; the schedule is dropped)
/// - Idle -> Running (`start` schedules again)
/// - Running | Idle -> Stopped (`stop`)
///
/// `Stopped` is terminal; a new pruner must be created to resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrunerPhase {
    Uninitialized,
    Running,
    /// Started before, but nothing is registered and nothing is scheduled.
    Idle,
    Stopped,
}

impl PrunerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, PrunerPhase::Stopped)
    }

    /// Can `start` register a target in this phase?
    pub fn accepts_targets(self) -> bool {
        !self.is_terminal()
    }
}
