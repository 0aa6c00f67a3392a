//! Ports - 外部サービスへの抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait はレジストリ・計算サービス・パラメータストアへの
//! インターフェースを提供し、SDK の詳細を隠蔽します。
//!
//! # 設計原則
//! - レジストリが唯一の正本（実行間で状態を持たない）
//! - ページングは `Page<T>` と `next_token` で表現し、ループは app 側が持つ
//! - すべての失敗は `ClientError` として返す

pub mod app_runner;
pub mod clock;
pub mod cluster;
pub mod event_sink;
pub mod function;
pub mod parameters;
pub mod registry;

// 主要な trait を再エクスポート
pub use self::app_runner::{AppServiceClient, AppServiceSummary};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::cluster::{ClusterClient, ClusterService};
pub use self::event_sink::{EventSink, NoopEventSink};
pub use self::function::{FunctionClient, FunctionSummary, PackageType};
pub use self::parameters::ParameterStore;
pub use self::registry::RegistryClient;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` on the last page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }
}
