//! Scheduler port - 定期実行の抽象化
//!
//! One implementation per deployment target; the pruner never branches on
//! which one it got.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::PruneInterval;
use crate::error::SchedulerError;

/// Callback invoked on every firing.
#[async_trait]
pub trait TickHandler: Send + Sync {
    async fn on_tick(&self);
}

/// Owns exactly one recurring-timer resource.
///
/// Dropping the handle must also stop future firings, without waiting.
#[async_trait]
pub trait ScheduleHandle: Send + Sync {
    /// Signals that no further tick may begin, then waits until a tick that
    /// is already running has returned.
    ///
    /// Once this resolves, the handler is never invoked again.
    async fn cancel(self: Box<Self>);
}

/// Creates recurring schedules.
///
/// # Contract
/// - The first firing happens one `interval` after `schedule` returns
/// - Later firings happen one `interval` after the previous tick returned
/// - Firings of one schedule never overlap
/// - [`PruneInterval::Never`] never fires
pub trait Scheduler: Send + Sync {
    fn schedule(
        &self,
        interval: PruneInterval,
        handler: Arc<dyn TickHandler>,
    ) -> Result<Box<dyn ScheduleHandle>, SchedulerError>;
}
