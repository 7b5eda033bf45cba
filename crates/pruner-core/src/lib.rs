//! pruner-core
//!
//! Background cache pruning that only does work after a reclamation pass.
//!
//! # モジュール構成
//! - **domain**: 値型（ids, interval, settings, phase, events, outcome）
//! - **ports**: 抽象化レイヤー（Prunable, Scheduler, CollectionSignal, Clock, IdGenerator, EventSink）
//! - **app**: Pruner 本体（probe, registry, pruner, builder, status）
//! - **impls**: 実装（TokioScheduler, EpochCounter, event sinks, ScopedCache）
//! - **error**: エラー型

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{Pruner, PrunerBuilder, PrunerStats};
pub use domain::{Period, PruneEvent, PruneInterval, PrunerPhase, PrunerSettings, TickOutcome};
pub use error::{PruneError, PrunerError, SchedulerError, SettingsError};
pub use ports::{CollectionSignal, EventSink, Prunable};
