//! boxclean-core
//!
//! Core building blocks for the ECR cleaner.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（reference, usage, policy, registry, decision, events, errors）
//! - **ports**: 抽象化レイヤー（RegistryClient, ClusterClient, FunctionClient, AppServiceClient, ParameterStore, Clock, EventSink）
//! - **usage**: 稼働中イメージの収集（ECS / Lambda / App Runner）
//! - **app**: アプリケーションロジック（Cleaner, Executor）
//! - **impls**: 実装（インメモリ実装、TracingEventSink など）
//! - **config**: 実行設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod usage;

pub use app::{CleanReport, Cleaner, Executor, Removal};
pub use config::CleanerConfig;
pub use domain::{CleanerError, ClientError};
pub use usage::UsageSetBuilder;
