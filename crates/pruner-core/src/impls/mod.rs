//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **TokioScheduler**: tokio タスクによる定期実行
//! - **EpochCounter / EveryTick**: CollectionSignal
//! - **TracingEventSink / NoopEventSink / RecordingEventSink**: EventSink
//! - **ScopedCache**: スコープ単位のキャッシュ（Prunable）

pub mod epoch;
pub mod event_sinks;
pub mod scoped_cache;
pub mod tokio_scheduler;

pub use self::epoch::{EpochCounter, EveryTick};
pub use self::event_sinks::{NoopEventSink, RecordingEventSink, TracingEventSink};
pub use self::scoped_cache::ScopedCache;
pub use self::tokio_scheduler::{TokioScheduleHandle, TokioScheduler};
