//! RepositoryPolicy - リポジトリのタグから決まる削除ポリシー
//!
//! # 設計原則
//! - opt-in: `BoxCleanerEnabled` が厳密に `"true"` の時だけ有効
//! - keep-days の値が壊れていても実行は止めない（デフォルト値に戻す）

use std::collections::HashMap;

use serde::Serialize;

/// Repository tag that opts a repository into cleaning.
pub const ENABLED_TAG: &str = "BoxCleanerEnabled";

/// Repository tag overriding the retention window, in days.
pub const KEEP_DAYS_TAG: &str = "BoxCleanerKeepDays";

/// Where the effective keep-days value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepDaysSource {
    Tag,
    Default,
    /// The tag was present but not an integer; the default applies.
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryPolicy {
    pub enabled: bool,
    pub keep_days: i64,
    pub keep_days_source: KeepDaysSource,
}

impl RepositoryPolicy {
    pub fn from_tags(tags: &HashMap<String, String>, default_keep_days: i64) -> Self {
        let enabled = tags.get(ENABLED_TAG).is_some_and(|value| value == "true");

        let (keep_days, keep_days_source) = match tags.get(KEEP_DAYS_TAG) {
            None => (default_keep_days, KeepDaysSource::Default),
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) => (days, KeepDaysSource::Tag),
                Err(_) => (default_keep_days, KeepDaysSource::Malformed(raw.clone())),
            },
        };

        Self {
            enabled,
            keep_days,
            keep_days_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[rstest]
    #[case::exact_true("true", true)]
    #[case::upper_case("TRUE", false)]
    #[case::title_case("True", false)]
    #[case::one("1", false)]
    #[case::empty("", false)]
    #[case::false_value("false", false)]
    fn enabled_requires_exact_true(#[case] value: &str, #[case] expected: bool) {
        let policy = RepositoryPolicy::from_tags(&tags(&[(ENABLED_TAG, value)]), 30);
        assert_eq!(policy.enabled, expected);
    }

    #[test]
    fn missing_enabled_tag_is_disabled() {
        let policy = RepositoryPolicy::from_tags(&HashMap::new(), 30);
        assert!(!policy.enabled);
        assert_eq!(policy.keep_days, 30);
        assert_eq!(policy.keep_days_source, KeepDaysSource::Default);
    }

    #[test]
    fn keep_days_tag_overrides_default() {
        let policy = RepositoryPolicy::from_tags(
            &tags(&[(ENABLED_TAG, "true"), (KEEP_DAYS_TAG, "7")]),
            30,
        );
        assert_eq!(policy.keep_days, 7);
        assert_eq!(policy.keep_days_source, KeepDaysSource::Tag);
    }

    #[rstest]
    #[case::letters("abc")]
    #[case::fraction("1.5")]
    #[case::empty("")]
    #[case::padded(" 7")]
    fn malformed_keep_days_falls_back(#[case] raw: &str) {
        let policy = RepositoryPolicy::from_tags(&tags(&[(KEEP_DAYS_TAG, raw)]), 30);
        assert_eq!(policy.keep_days, 30);
        assert_eq!(
            policy.keep_days_source,
            KeepDaysSource::Malformed(raw.to_string())
        );
    }
}
