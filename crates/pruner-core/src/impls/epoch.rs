//! CollectionSignal implementations.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ports::CollectionSignal;

/// Epoch advanced explicitly by the code that reclaims memory.
///
/// # 使用例
/// ```ignore
/// let epoch = Arc::new(EpochCounter::new());
/// let pruner = PrunerBuilder::new().signal(epoch.clone()).build();
///
/// arena.reset();
/// epoch.advance();
/// ```
#[derive(Debug, Default)]
pub struct EpochCounter {
    epoch: AtomicU64,
}

impl EpochCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one reclamation pass and returns the new epoch.
    pub fn advance(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }
}

impl CollectionSignal for EpochCounter {
    fn epoch(&self) -> u64 {
        self.current()
    }
}

/// Reports a new epoch on every observation, so every tick prunes.
///
/// Use it when nothing publishes reclamation passes. Pruning then costs one
/// pass per interval whether or not anything became reclaimable.
#[derive(Debug, Default)]
pub struct EveryTick {
    observations: AtomicU64,
}

impl EveryTick {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionSignal for EveryTick {
    fn epoch(&self) -> u64 {
        self.observations.fetch_add(1, Ordering::AcqRel) + 1
    }
}
