//! Decision model: keep or delete one image reference.
//!
//! This module defines the Verdict type (what happens to a reference) and the
//! RetentionDecider (age window + usage membership). Deciders are pure: the
//! actual deletion is carried out by the executor.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::reference::ImageReference;
use super::usage::UsageSet;

/// Usage verdict for one reference of an old image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum Verdict {
    /// Referenced by a running workload through `image_id`.
    Retain { image_id: String },
    Delete,
}

/// Fractional age in days: elapsed hours divided by 24, no rounding.
pub fn image_age_days(now: DateTime<Utc>, pushed_at: DateTime<Utc>) -> f64 {
    let elapsed = now.signed_duration_since(pushed_at);
    elapsed.num_milliseconds() as f64 / 3_600_000.0 / 24.0
}

/// Combines the retention window and the usage set into a verdict.
///
/// Borrowed for the lifetime of one repository walk; the usage set is
/// read-only once built.
#[derive(Debug, Clone, Copy)]
pub struct RetentionDecider<'a> {
    usage: &'a UsageSet,
    keep_days: i64,
}

impl<'a> RetentionDecider<'a> {
    pub fn new(usage: &'a UsageSet, keep_days: i64) -> Self {
        Self { usage, keep_days }
    }

    pub fn keep_days(&self) -> i64 {
        self.keep_days
    }

    /// Strictly older than the window. An image exactly at the boundary is kept.
    pub fn is_old(&self, age_days: f64) -> bool {
        age_days > self.keep_days as f64
    }

    /// Only consulted once the image is old; young images never reach it.
    pub fn usage_verdict(&self, reference: &ImageReference) -> Verdict {
        match self.usage.find_usage(reference) {
            Some(image_id) => Verdict::Retain { image_id },
            None => Verdict::Delete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn age_is_fractional() {
        let pushed = at(2022, 8, 1, 0, 0, 0);
        let now = at(2022, 8, 31, 0, 0, 1);
        let age = image_age_days(now, pushed);
        assert!(age > 30.0);
        assert!(age < 30.001);

        let half = image_age_days(at(2022, 8, 1, 12, 0, 0), pushed);
        assert_eq!(half, 0.5);
    }

    #[rstest]
    #[case::younger(29.9, false)]
    #[case::boundary(30.0, false)]
    #[case::just_older(30.00001, true)]
    #[case::much_older(400.0, true)]
    fn boundary_is_retained(#[case] age: f64, #[case] expected_old: bool) {
        let usage = UsageSet::new();
        let decider = RetentionDecider::new(&usage, 30);
        assert_eq!(decider.is_old(age), expected_old);
    }

    #[test]
    fn old_used_image_is_kept() {
        let usage: UsageSet = ["repo1uri:v1"].into_iter().collect();
        let decider = RetentionDecider::new(&usage, 30);
        let reference = ImageReference::tagged("repo1", "repo1uri", "d1", "v1");

        assert_eq!(
            decider.usage_verdict(&reference),
            Verdict::Retain {
                image_id: "repo1uri:v1".to_string()
            }
        );
    }

    #[test]
    fn tag_is_kept_when_its_digest_is_used() {
        let usage: UsageSet = ["repo1uri@d1"].into_iter().collect();
        let decider = RetentionDecider::new(&usage, 30);
        let reference = ImageReference::tagged("repo1", "repo1uri", "d1", "v1");

        assert_eq!(
            decider.usage_verdict(&reference),
            Verdict::Retain {
                image_id: "repo1uri@d1".to_string()
            }
        );
    }

    #[test]
    fn old_unused_image_is_deleted() {
        let usage: UsageSet = ["repo1uri:v2"].into_iter().collect();
        let decider = RetentionDecider::new(&usage, 30);
        let reference = ImageReference::tagged("repo1", "repo1uri", "d1", "v1");

        assert_eq!(decider.usage_verdict(&reference), Verdict::Delete);
    }

    #[test]
    fn negative_keep_days_treats_every_image_as_old() {
        let usage = UsageSet::new();
        let decider = RetentionDecider::new(&usage, -1);
        assert!(decider.is_old(0.0));
    }
}
