//! LivenessProbe - 回収パスの検知
//!
//! Remembers the collection epoch at its last reset. While the epoch is
//! unchanged the probe is "alive": nothing was reclaimed, so pruning would be
//! busy work. It can under-report (a pass that never bumped the epoch) but
//! never reports a pass that did not happen.

use std::sync::Arc;

use crate::ports::CollectionSignal;

pub struct LivenessProbe {
    signal: Arc<dyn CollectionSignal>,
    observed: u64,
}

impl LivenessProbe {
    /// Starts the first observation window immediately.
    pub fn new(signal: Arc<dyn CollectionSignal>) -> Self {
        let observed = signal.epoch();
        Self { signal, observed }
    }

    /// True while no collection has been observed since the last reset.
    pub fn is_alive(&self) -> bool {
        self.signal.epoch() == self.observed
    }

    /// Begins a new observation window.
    pub fn reset(&mut self) {
        self.observed = self.signal.epoch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{EpochCounter, EveryTick};

    #[test]
    fn alive_until_epoch_moves() {
        let epoch = Arc::new(EpochCounter::new());
        let mut probe = LivenessProbe::new(epoch.clone());
        assert!(probe.is_alive());
        assert!(probe.is_alive());

        epoch.advance();
        assert!(!probe.is_alive());
        // stays dead until reset
        assert!(!probe.is_alive());

        probe.reset();
        assert!(probe.is_alive());
    }

    #[test]
    fn several_collections_in_one_window_look_like_one() {
        let epoch = Arc::new(EpochCounter::new());
        let mut probe = LivenessProbe::new(epoch.clone());
        epoch.advance();
        epoch.advance();
        epoch.advance();

        assert!(!probe.is_alive());
        probe.reset();
        assert!(probe.is_alive());
    }

    #[test]
    fn every_tick_signal_is_never_alive() {
        let mut probe = LivenessProbe::new(Arc::new(EveryTick::new()));
        assert!(!probe.is_alive());
        probe.reset();
        assert!(!probe.is_alive());
    }
}
