//! CleanerConfig - 実行全体で不変の設定
//!
//! 環境変数から読み込みます。値が壊れていてもエラーにはせず、デフォルトに戻します。

use serde::Serialize;

pub const DRY_RUN_ENV: &str = "DRY_RUN";
pub const DEFAULT_KEEP_DAYS_ENV: &str = "DEFAULT_KEEP_DAYS";

/// Retention window used when a repository has no usable keep-days tag.
pub const DEFAULT_KEEP_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanerConfig {
    /// When set, deletions are only logged.
    pub dry_run: bool,
    pub default_keep_days: i64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            default_keep_days: DEFAULT_KEEP_DAYS,
        }
    }
}

impl CleanerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Only `DRY_RUN=false` turns destructive mode on; any other value keeps
    /// dry-run. An unparseable `DEFAULT_KEEP_DAYS` is ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let dry_run = lookup(DRY_RUN_ENV).is_none_or(|value| value != "false");
        let default_keep_days = lookup(DEFAULT_KEEP_DAYS_ENV)
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(defaults.default_keep_days);

        Self {
            dry_run,
            default_keep_days,
        }
    }
}
