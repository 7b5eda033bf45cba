//! TokioScheduler - tokio タスクによる定期実行
//!
//! One spawned task per schedule:
//! ```text
//! loop {
//!   ├─► sleep(period)  (races the shutdown signal)
//!   ├─► shutdown requested? → exit
//!   └─► handler.on_tick().await  (never raced, runs to completion)
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::PruneInterval;
use crate::error::SchedulerError;
use crate::ports::{ScheduleHandle, Scheduler, TickHandler};

/// Schedules ticks as tasks on the tokio runtime of the calling context.
///
/// Scheduling outside of any runtime fails with [`SchedulerError::NoRuntime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn runtime(&self) -> Result<Handle, SchedulerError> {
        Handle::try_current().map_err(|_| SchedulerError::NoRuntime)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(
        &self,
        interval: PruneInterval,
        handler: Arc<dyn TickHandler>,
    ) -> Result<Box<dyn ScheduleHandle>, SchedulerError> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Never: nothing can fire, so there is nothing to spawn.
        let join = match interval.period() {
            Some(period) => {
                let runtime = self.runtime()?;
                Some(runtime.spawn(tick_loop(period, handler, shutdown_rx)))
            }
            None => None,
        };

        Ok(Box::new(TokioScheduleHandle { shutdown_tx, join }))
    }
}

/// Handle to one spawned tick loop.
/// - `cancel()` で停止を通知し、実行中の tick の完了を待つ
/// - drop すると sender が閉じ、ループは次の安全点で終了する
pub struct TokioScheduleHandle {
    shutdown_tx: watch::Sender<bool>,
    join: Option<JoinHandle<()>>,
}

#[async_trait]
impl ScheduleHandle for TokioScheduleHandle {
    async fn cancel(mut self: Box<Self>) {
        // ignore send error: the loop may already have exited
        let _ = self.shutdown_tx.send(true);
        if let Some(join) = self.join.take() {
            if let Err(err) = join.await {
                debug!(error = %err, "tick loop ended abnormally");
            }
        }
    }
}

async fn tick_loop(
    period: Duration,
    handler: Arc<dyn TickHandler>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                // Err: every handle was dropped
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = tokio::time::sleep(period) => {}
        }

        // the sleep and the signal may have completed together
        if *shutdown_rx.borrow() {
            break;
        }

        handler.on_tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct CountingTick {
        ticks: AtomicUsize,
    }

    #[async_trait]
    impl TickHandler for CountingTick {
        async fn on_tick(&self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn every(millis: u64) -> PruneInterval {
        PruneInterval::from_millis(millis).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_fires_after_one_interval() {
        let handler = Arc::new(CountingTick::default());
        let handle = TokioScheduler::new()
            .schedule(every(100), handler.clone())
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(handler.ticks.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(handler.ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handler.ticks.load(Ordering::SeqCst), 2);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn never_interval_does_not_fire() {
        let handler = Arc::new(CountingTick::default());
        let handle = TokioScheduler::new()
            .schedule(PruneInterval::Never, handler.clone())
            .unwrap();

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(handler.ticks.load(Ordering::SeqCst), 0);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_after_cancel() {
        let handler = Arc::new(CountingTick::default());
        let handle = TokioScheduler::new()
            .schedule(every(10), handler.clone())
            .unwrap();

        tokio::time::sleep(Duration::from_millis(35)).await;
        handle.cancel().await;
        let seen = handler.ticks.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(handler.ticks.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let handler = Arc::new(CountingTick::default());
        let handle = TokioScheduler::new()
            .schedule(every(10), handler.clone())
            .unwrap();
        drop(handle);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handler.ticks.load(Ordering::SeqCst), 0);
        // the loop released its handler
        assert_eq!(Arc::strong_count(&handler), 1);
    }

    struct SlowTick {
        entered: Notify,
        finished: AtomicBool,
    }

    #[async_trait]
    impl TickHandler for SlowTick {
        async fn on_tick(&self) {
            self.entered.notify_one();
            tokio::time::sleep(Duration::from_millis(200)).await;
            self.finished.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn cancel_waits_for_in_flight_tick() {
        let handler = Arc::new(SlowTick {
            entered: Notify::new(),
            finished: AtomicBool::new(false),
        });
        let handle = TokioScheduler::new()
            .schedule(every(5), handler.clone())
            .unwrap();

        handler.entered.notified().await;
        handle.cancel().await;

        assert!(handler.finished.load(Ordering::SeqCst));
    }

    #[test]
    fn scheduling_outside_a_runtime_is_a_resource_error() {
        let result = TokioScheduler::new().schedule(every(10), Arc::new(CountingTick::default()));
        assert!(matches!(result, Err(SchedulerError::NoRuntime)));
    }

    #[test]
    fn never_interval_needs_no_runtime() {
        let result =
            TokioScheduler::new().schedule(PruneInterval::Never, Arc::new(CountingTick::default()));
        assert!(result.is_ok());
    }
}
