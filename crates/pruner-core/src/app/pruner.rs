//! Pruner - 回収パスを検知したときだけキャッシュを剪定する
//!
//! # フロー
//! 1. `start(target)` で登録。最初の登録で Scheduler を作る（interval はここで一度だけ読む）
//! 2. tick ごとに LivenessProbe を確認
//! 3. alive なら何もしない。dead なら全ターゲットを登録順に prune して probe を reset
//!    （全ターゲットが解放済みなら Scheduler を捨てて Idle へ。次の `start` で再作成）
//! 4. `stop()` で Scheduler を cancel、実行中の tick を待ち、registry を空にする
//!
//! # Locking
//! One mutex guards `{stopped, registry, probe, schedule}`. A tick holds it for
//! the whole pass, so `start`/`stop` wait for a running pass and the registry
//! never changes mid-prune. There is no prune timeout: a target whose `prune`
//! never returns stalls this pruner.
//!
//! A target must not call back into the pruner that is pruning it; the lock
//! is already held.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::builder::PrunerBuilder;
use super::probe::LivenessProbe;
use super::registry::PruneRegistry;
use super::status::{PrunerStats, TickCounters};
use crate::domain::{PruneEvent, PrunerId, PrunerPhase, PrunerSettings, TickOutcome};
use crate::error::{PruneError, PrunerError};
use crate::ports::{
    Clock, CollectionSignal, EventSink, IdGenerator, Prunable, ScheduleHandle, Scheduler,
    TickHandler,
};

/// Everything a pruner is wired from. Assembled by [`PrunerBuilder`].
pub(crate) struct PrunerParts {
    pub settings: PrunerSettings,
    pub scheduler: Arc<dyn Scheduler>,
    pub signal: Arc<dyn CollectionSignal>,
    pub sink: Arc<dyn EventSink>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

struct PrunerState {
    stopped: bool,
    started: bool,
    registry: PruneRegistry,
    probe: LivenessProbe,
    /// Present only while not stopped and the registry is non-empty.
    schedule: Option<Box<dyn ScheduleHandle>>,
    counters: TickCounters,
}

impl PrunerState {
    fn phase(&self) -> PrunerPhase {
        if self.stopped {
            PrunerPhase::Stopped
        } else if self.schedule.is_some() {
            PrunerPhase::Running
        } else if self.started {
            PrunerPhase::Idle
        } else {
            PrunerPhase::Uninitialized
        }
    }
}

struct Shared {
    id: PrunerId,
    settings: PrunerSettings,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    state: Mutex<PrunerState>,
}

/// Background cache pruner.
///
/// Cloning is cheap and every clone drives the same pruner. The schedule only
/// holds the pruner weakly; dropping the last clone drops the schedule handle,
/// which ends the background task without waiting. Call [`Pruner::stop`] to
/// wait for an in-flight pass.
///
/// # 使用例
/// ```ignore
/// let epoch = Arc::new(EpochCounter::new());
/// let pruner = PrunerBuilder::new()
///     .settings(PrunerSettings::new(PruneInterval::from_millis(500)?))
///     .signal(epoch.clone())
///     .build();
///
/// pruner.start(&cache).await?;
/// epoch.advance();          // a reclamation pass happened
/// // ... next tick prunes `cache`
/// pruner.stop().await;
/// ```
#[derive(Clone)]
pub struct Pruner {
    shared: Arc<Shared>,
}

impl Pruner {
    /// Default wiring (tokio scheduler, prune-every-tick signal, tracing sink).
    pub fn new(settings: PrunerSettings) -> Self {
        PrunerBuilder::new().settings(settings).build()
    }

    pub fn builder() -> PrunerBuilder {
        PrunerBuilder::new()
    }

    pub(crate) fn from_parts(parts: PrunerParts) -> Self {
        let id = parts.ids.generate_pruner_id();
        let state = PrunerState {
            stopped: false,
            started: false,
            registry: PruneRegistry::new(),
            probe: LivenessProbe::new(parts.signal),
            schedule: None,
            counters: TickCounters::default(),
        };
        Self {
            shared: Arc::new(Shared {
                id,
                settings: parts.settings,
                scheduler: parts.scheduler,
                sink: parts.sink,
                clock: parts.clock,
                ids: parts.ids,
                state: Mutex::new(state),
            }),
        }
    }

    pub fn id(&self) -> PrunerId {
        self.shared.id
    }

    pub fn settings(&self) -> PrunerSettings {
        self.shared.settings
    }

    /// Registers `target` for pruning; the pruner keeps only a weak reference.
    ///
    /// The first registration creates the schedule. Registering the same
    /// target twice prunes it twice per pass.
    pub async fn start<P: Prunable + 'static>(&self, target: &Arc<P>) -> Result<(), PrunerError> {
        let target = Arc::downgrade(target) as Weak<dyn Prunable>;
        self.start_weak(target).await
    }

    /// [`Pruner::start`] for targets already erased to `dyn Prunable`.
    ///
    /// # Errors
    /// - [`PrunerError::Stopped`] after `stop`; nothing is registered
    /// - [`PrunerError::Scheduler`] if the schedule could not be created;
    ///   nothing is registered and `start` may be retried
    pub async fn start_weak(&self, target: Weak<dyn Prunable>) -> Result<(), PrunerError> {
        let shared = &self.shared;
        let mut state = shared.state.lock().await;
        if !state.phase().accepts_targets() {
            return Err(PrunerError::Stopped);
        }

        if state.schedule.is_none() {
            let interval = shared.settings.cache_pruning_interval;
            if interval.is_never() {
                debug!(pruner = %shared.id, "interval is never; only explicit ticks prune");
            }
            let handler: Arc<dyn TickHandler> = Arc::new(ScheduledTick {
                shared: Arc::downgrade(shared),
            });
            let schedule = shared.scheduler.schedule(interval, handler).map_err(|err| {
                warn!(pruner = %shared.id, error = %err, "failed to create pruning schedule");
                err
            })?;
            state.schedule = Some(schedule);
            state.started = true;
            shared.emit(|at| PruneEvent::Started {
                pruner: shared.id,
                interval,
                at,
            });
        }

        state.registry.push(target);
        Ok(())
    }

    /// Stops pruning for good.
    ///
    /// Blocks until a pass that is already running has returned, then
    /// discards the schedule and empties the registry. Calling it on a pruner
    /// that was never started, or calling it twice, does nothing.
    pub async fn stop(&self) {
        let shared = &self.shared;
        let schedule = {
            let mut state = shared.state.lock().await;
            match state.phase() {
                PrunerPhase::Uninitialized => {
                    debug!(pruner = %shared.id, "stop on a pruner that was never started");
                    return;
                }
                PrunerPhase::Stopped => return,
                PrunerPhase::Running | PrunerPhase::Idle => {
                    state.stopped = true;
                    state.schedule.take()
                }
            }
        };

        // outside the lock: the in-flight tick needs it to finish
        if let Some(schedule) = schedule {
            schedule.cancel().await;
        }

        let discarded = shared.state.lock().await.registry.clear();
        shared.emit(|at| PruneEvent::Stopped {
            pruner: shared.id,
            discarded,
            at,
        });
    }

    /// Runs one tick now, exactly as the schedule would.
    ///
    /// This is the only way a pruner configured with
    /// [`PruneInterval::Never`](crate::domain::PruneInterval::Never) prunes.
    pub async fn tick(&self) -> TickOutcome {
        self.shared.tick().await
    }

    pub async fn phase(&self) -> PrunerPhase {
        self.shared.state.lock().await.phase()
    }

    pub async fn registered(&self) -> usize {
        self.shared.state.lock().await.registry.len()
    }

    pub async fn stats(&self) -> PrunerStats {
        let state = self.shared.state.lock().await;
        let counters = &state.counters;
        PrunerStats {
            pruner: self.shared.id,
            phase: state.phase(),
            registered: state.registry.len(),
            ticks: counters.ticks,
            skipped: counters.skipped,
            passes: counters.passes,
            targets_pruned: counters.targets_pruned,
            targets_failed: counters.targets_failed,
            targets_released: counters.targets_released,
            last_pass_at: counters.last_pass_at,
        }
    }
}

impl Shared {
    fn emit(&self, event: impl FnOnce(DateTime<Utc>) -> PruneEvent) {
        self.sink.emit(event(self.clock.now()));
    }

    async fn tick(&self) -> TickOutcome {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.stopped {
            return TickOutcome::Stopped;
        }

        state.counters.ticks += 1;
        if state.probe.is_alive() {
            state.counters.skipped += 1;
            self.emit(|at| PruneEvent::TickSkipped {
                pruner: self.id,
                at,
            });
            return TickOutcome::Skipped;
        }

        let pass = self.ids.generate_pass_id();
        let (mut pruned, mut failed, mut released) = (0, 0, 0);

        for (index, entry) in state.registry.snapshot().into_iter().enumerate() {
            let Some(target) = entry.upgrade() else {
                released += 1;
                self.emit(|at| PruneEvent::TargetReleased {
                    pruner: self.id,
                    pass,
                    index,
                    at,
                });
                continue;
            };

            match prune_isolated(target.as_ref()).await {
                Ok(()) => {
                    pruned += 1;
                    self.emit(|at| PruneEvent::TargetPruned {
                        pruner: self.id,
                        pass,
                        index,
                        target: target.name().to_string(),
                        at,
                    });
                }
                Err(err) => {
                    failed += 1;
                    self.emit(|at| PruneEvent::TargetFailed {
                        pruner: self.id,
                        pass,
                        index,
                        target: target.name().to_string(),
                        error: err.to_string(),
                        at,
                    });
                }
            }
        }

        state.registry.compact();
        state.probe.reset();

        // May run on the schedule's own task: drop it, never cancel.
        // The loop exits once this tick returns.
        if state.registry.is_empty() {
            if let Some(schedule) = state.schedule.take() {
                drop(schedule);
                self.emit(|at| PruneEvent::ScheduleReleased {
                    pruner: self.id,
                    at,
                });
            }
        }

        let at = self.clock.now();
        let counters = &mut state.counters;
        counters.passes += 1;
        counters.targets_pruned += pruned as u64;
        counters.targets_failed += failed as u64;
        counters.targets_released += released as u64;
        counters.last_pass_at = Some(at);

        self.sink.emit(PruneEvent::PassCompleted {
            pruner: self.id,
            pass,
            pruned,
            failed,
            released,
            at,
        });

        TickOutcome::Pruned {
            pruned,
            failed,
            released,
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if self.state.get_mut().schedule.is_some() {
            debug!(pruner = %self.id, "pruner dropped while running; schedule released without waiting");
        }
    }
}

/// What the schedule invokes. Weak, so the schedule never keeps the pruner alive.
struct ScheduledTick {
    shared: Weak<Shared>,
}

#[async_trait]
impl TickHandler for ScheduledTick {
    async fn on_tick(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.tick().await;
        }
    }
}

/// A failing or panicking target must not take the rest of the pass with it.
async fn prune_isolated(target: &dyn Prunable) -> Result<(), PruneError> {
    match AssertUnwindSafe(target.prune()).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(PruneError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
