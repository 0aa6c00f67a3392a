//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryRegistry** など: ページング・失敗注入・呼び出し記録つきのインメモリ実装
//! - **TracingEventSink**: 本番用のイベント出力（tracing）
//! - **RecordingEventSink**: テスト用にイベントを溜める
//!
//! # 本番用実装
//! AWS SDK を使う実装は別クレート `boxclean-aws` に配置します。

pub mod event_sinks;
pub mod inmem_compute;
pub mod inmem_registry;

pub use self::event_sinks::{RecordingEventSink, TracingEventSink};
pub use self::inmem_compute::{
    InMemoryAppServices, InMemoryClusters, InMemoryFunctions, InMemoryParameters,
};
pub use self::inmem_registry::{DeleteCall, InMemoryRegistry};

use std::sync::{Mutex, PoisonError};

use crate::domain::ClientError;
use crate::ports::Page;

/// Slices `items` into pages of `page_size`; the token is the next offset.
pub(crate) fn paginate<T: Clone>(
    items: &[T],
    page_size: usize,
    next_token: Option<String>,
    operation: &'static str,
) -> Result<Page<T>, ClientError> {
    let start = match next_token {
        None => 0,
        Some(token) => token
            .parse::<usize>()
            .map_err(|_| ClientError::new(operation, format!("invalid next token {token:?}")))?,
    };
    let end = (start + page_size.max(1)).min(items.len());
    let next_token = (end < items.len()).then(|| end.to_string());

    Ok(Page::new(items[start.min(end)..end].to_vec(), next_token))
}

/// Shared call log and failure injection for the in-memory clients.
#[derive(Debug, Default)]
pub(crate) struct CallLog {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl CallLog {
    pub(crate) fn fail_on(&mut self, operation: &'static str) {
        self.fail_on = Some(operation);
    }

    /// Records the call and fails it when it is the injected failure.
    pub(crate) fn record(&self, operation: &'static str) -> Result<(), ClientError> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(operation.to_string());
        if self.fail_on == Some(operation) {
            return Err(ClientError::new(operation, "injected failure"));
        }
        Ok(())
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
