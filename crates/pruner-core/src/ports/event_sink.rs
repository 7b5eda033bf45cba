//! EventSink port - イベント記録の抽象化
//!
//! # 実装
//! - TracingEventSink: `tracing` に流す（デフォルト）
//! - NoopEventSink: 何もしない
//! - RecordingEventSink: メモリに保持（テスト用）

use crate::domain::PruneEvent;

/// Receives every `PruneEvent` a pruner produces.
///
/// `emit` is called while the pruner holds its state lock, so it must not
/// block for long or call back into the pruner.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PruneEvent);
}
