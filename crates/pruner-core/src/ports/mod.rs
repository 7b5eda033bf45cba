//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。pruner はここにある trait だけを見て、
//! タイマーの実装やメモリ管理の詳細を知りません。

pub mod clock;
pub mod collection_signal;
pub mod event_sink;
pub mod id_generator;
pub mod prunable;
pub mod scheduler;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::collection_signal::CollectionSignal;
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::prunable::Prunable;
pub use self::scheduler::{ScheduleHandle, Scheduler, TickHandler};
