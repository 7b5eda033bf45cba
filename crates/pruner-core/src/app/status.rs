//! Status - 剪定の統計

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{PrunerId, PrunerPhase};

/// Point-in-time view of a pruner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrunerStats {
    pub pruner: PrunerId,
    pub phase: PrunerPhase,
    /// Current registry entries, duplicates included.
    pub registered: usize,
    /// Ticks that reached the probe (stopped ticks are not counted).
    pub ticks: u64,
    pub skipped: u64,
    pub passes: u64,
    pub targets_pruned: u64,
    pub targets_failed: u64,
    pub targets_released: u64,
    pub last_pass_at: Option<DateTime<Utc>>,
}

/// Running totals kept alongside the pruner state.
#[derive(Debug, Clone, Default)]
pub(crate) struct TickCounters {
    pub ticks: u64,
    pub skipped: u64,
    pub passes: u64,
    pub targets_pruned: u64,
    pub targets_failed: u64,
    pub targets_released: u64,
    pub last_pass_at: Option<DateTime<Utc>>,
}
