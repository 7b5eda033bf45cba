//! PrunerBuilder - Pruner の構築とワイヤリング
//!
//! Every port has a default, so `PrunerBuilder::new().build()` is a working
//! pruner:
//! - scheduler: `TokioScheduler` (runtime of the caller)
//! - signal: `EveryTick` (prune on every tick)
//! - sink: `TracingEventSink`
//! - clock: `SystemClock`, ids: `UlidGenerator`

use std::sync::Arc;

use super::pruner::{Pruner, PrunerParts};
use crate::domain::PrunerSettings;
use crate::impls::{EveryTick, TokioScheduler, TracingEventSink};
use crate::ports::{
    Clock, CollectionSignal, EventSink, IdGenerator, Scheduler, SystemClock, UlidGenerator,
};

/// # 使用例
/// ```ignore
/// let pruner = PrunerBuilder::new()
///     .settings(PrunerSettings::from_json_file("pruner.json")?)
///     .signal(epoch.clone())
///     .event_sink(Arc::new(NoopEventSink))
///     .build();
/// ```
pub struct PrunerBuilder {
    settings: PrunerSettings,
    scheduler: Option<Arc<dyn Scheduler>>,
    signal: Option<Arc<dyn CollectionSignal>>,
    sink: Option<Arc<dyn EventSink>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl PrunerBuilder {
    pub fn new() -> Self {
        Self {
            settings: PrunerSettings::default(),
            scheduler: None,
            signal: None,
            sink: None,
            clock: None,
            ids: None,
        }
    }

    pub fn settings(mut self, settings: PrunerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Where the liveness probe reads collection epochs from.
    pub fn signal(mut self, signal: Arc<dyn CollectionSignal>) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Pruner {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)));
        Pruner::from_parts(PrunerParts {
            settings: self.settings,
            scheduler: self
                .scheduler
                .unwrap_or_else(|| Arc::new(TokioScheduler::new())),
            signal: self.signal.unwrap_or_else(|| Arc::new(EveryTick::new())),
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingEventSink)),
            clock,
            ids,
        })
    }
}

impl Default for PrunerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
