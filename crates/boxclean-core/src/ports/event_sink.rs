//! EventSink port - イベント記録の抽象化
//!
//! コンポーネントはグローバルな logger を持たず、注入された sink にイベントを渡します。
//!
//! # 実装
//! - NoopEventSink: 何もしない（テストのデフォルト）
//! - TracingEventSink / RecordingEventSink: `impls` を参照

use crate::domain::CleanerEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: CleanerEvent);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: CleanerEvent) {}
}
