//! UsageSet - 稼働中ワークロードが参照しているイメージの集合
//!
//! 実行ごとに作り直し、永続化はしません。

use std::collections::HashSet;
use std::collections::hash_set;

use super::reference::ImageReference;

/// Deduplicated set of image reference strings currently configured to run.
///
/// Entries are compared as plain strings; no normalization is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageSet {
    images: HashSet<String>,
}

impl UsageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the image was already present.
    pub fn insert(&mut self, image: impl Into<String>) -> bool {
        self.images.insert(image.into())
    }

    pub fn contains(&self, image: &str) -> bool {
        self.images.contains(image)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.images.iter()
    }

    /// Finds the entry that keeps `reference` alive, if any.
    ///
    /// The tag form is checked first, then the digest form. An untagged
    /// reference can only match by digest.
    pub fn find_usage(&self, reference: &ImageReference) -> Option<String> {
        if let Some(tag_id) = reference.tag_id()
            && self.contains(&tag_id)
        {
            return Some(tag_id);
        }

        let digest_id = reference.digest_id();
        self.contains(&digest_id).then_some(digest_id)
    }
}

impl<S: Into<String>> FromIterator<S> for UsageSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            images: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for UsageSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.images.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_is_noop() {
        let mut usage = UsageSet::new();
        assert!(usage.insert("repo1uri:v1"));
        assert!(!usage.insert("repo1uri:v1"));
        assert_eq!(usage.len(), 1);
    }

    #[test]
    fn tag_counts_as_used_when_digest_is_referenced() {
        let usage: UsageSet = ["repo1uri@d1"].into_iter().collect();
        let reference = ImageReference::tagged("repo1", "repo1uri", "d1", "v1");

        assert_eq!(usage.find_usage(&reference).as_deref(), Some("repo1uri@d1"));
    }

    #[test]
    fn tag_form_is_preferred_over_digest_form() {
        let usage: UsageSet = ["repo1uri@d1", "repo1uri:v1"].into_iter().collect();
        let reference = ImageReference::tagged("repo1", "repo1uri", "d1", "v1");

        assert_eq!(usage.find_usage(&reference).as_deref(), Some("repo1uri:v1"));
    }

    #[test]
    fn untagged_reference_ignores_tag_entries() {
        let usage: UsageSet = ["repo1uri:v1"].into_iter().collect();
        let reference = ImageReference::untagged("repo1", "repo1uri", "d1");

        assert_eq!(usage.find_usage(&reference), None);
    }

    #[test]
    fn same_tag_in_other_repository_does_not_match() {
        let usage: UsageSet = ["repo2uri:v1"].into_iter().collect();
        let reference = ImageReference::tagged("repo1", "repo1uri", "d1", "v1");

        assert_eq!(usage.find_usage(&reference), None);
    }
}
