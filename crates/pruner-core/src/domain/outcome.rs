//! Outcome of a single tick.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickOutcome {
    /// The pruner was stopped; the tick had no side effects.
    Stopped,
    /// No collection observed since the last pass.
    Skipped,
    /// A pass ran over every registered target.
    Pruned {
        pruned: usize,
        failed: usize,
        released: usize,
    },
}

impl TickOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TickOutcome::Pruned { .. })
    }
}
