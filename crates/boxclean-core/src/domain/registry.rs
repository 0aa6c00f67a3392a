//! Registry records as seen by the walker.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::reference::ImageReference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub name: String,
    pub arn: String,
    pub uri: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, arn: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
            uri: uri.into(),
        }
    }
}

/// One digest in a repository with its push time and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDetail {
    pub digest: String,
    pub tags: Vec<String>,
    pub pushed_at: DateTime<Utc>,
}

impl ImageDetail {
    pub fn new(digest: impl Into<String>, tags: Vec<String>, pushed_at: DateTime<Utc>) -> Self {
        Self {
            digest: digest.into(),
            tags,
            pushed_at,
        }
    }

    /// Expands the image into its deletion candidates.
    ///
    /// One reference per tag; a single digest reference when untagged.
    pub fn candidates(&self, repository: &Repository) -> Vec<ImageReference> {
        if self.tags.is_empty() {
            return vec![ImageReference::untagged(
                &repository.name,
                &repository.uri,
                &self.digest,
            )];
        }

        self.tags
            .iter()
            .map(|tag| ImageReference::tagged(&repository.name, &repository.uri, &self.digest, tag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repository() -> Repository {
        Repository::new("repo1", "arn:aws:ecr:eu-west-1:1:repository/repo1", "repo1uri")
    }

    #[test]
    fn multi_tag_image_yields_one_candidate_per_tag() {
        let pushed_at = Utc.with_ymd_and_hms(2022, 8, 1, 0, 0, 0).unwrap();
        let image = ImageDetail::new("d1", vec!["v1".into(), "latest".into()], pushed_at);

        let candidates = image.candidates(&repository());

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].to_string(), "repo1uri:v1");
        assert_eq!(candidates[1].to_string(), "repo1uri:latest");
        assert!(candidates.iter().all(|c| c.digest == "d1"));
    }

    #[test]
    fn untagged_image_yields_digest_candidate() {
        let pushed_at = Utc.with_ymd_and_hms(2022, 8, 1, 0, 0, 0).unwrap();
        let image = ImageDetail::new("d1", vec![], pushed_at);

        let candidates = image.candidates(&repository());

        assert_eq!(candidates, vec![ImageReference::untagged("repo1", "repo1uri", "d1")]);
    }
}
