//! InMemoryRegistry - 開発用のレジストリ
//!
//! # 実装詳細
//! - リポジトリ・イメージ・タグを Vec/HashMap で保持
//! - page_size でページングを再現
//! - batch_delete_image の呼び出しを記録（実際にイメージを消すことはしない）

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CallLog, paginate};
use crate::domain::{ClientError, ImageDetail, ImageIdentifier, Repository};
use crate::ports::{Page, RegistryClient};

/// A recorded batch-delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCall {
    pub repository_name: String,
    pub image: ImageIdentifier,
}

impl DeleteCall {
    pub fn tag(repository_name: &str, tag: &str) -> Self {
        Self {
            repository_name: repository_name.to_string(),
            image: ImageIdentifier::Tag(tag.to_string()),
        }
    }

    pub fn digest(repository_name: &str, digest: &str) -> Self {
        Self {
            repository_name: repository_name.to_string(),
            image: ImageIdentifier::Digest(digest.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredRepository {
    repository: Repository,
    tags: HashMap<String, String>,
    images: Vec<ImageDetail>,
}

/// ```ignore
/// let registry = InMemoryRegistry::new()
///     .with_repository("repo1", "repo1uri", &[("BoxCleanerEnabled", "true")])
///     .with_image("repo1", "d1", &["v1"], pushed_at);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    repositories: Vec<StoredRepository>,
    page_size: usize,
    deletes: Mutex<Vec<DeleteCall>>,
    log: CallLog,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            page_size: 100,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.log.fail_on(operation);
        self
    }

    pub fn with_repository(mut self, name: &str, uri: &str, tags: &[(&str, &str)]) -> Self {
        self.repositories.push(StoredRepository {
            repository: Repository::new(
                name,
                format!("arn:aws:ecr:us-east-1:000000000000:repository/{name}"),
                uri,
            ),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            images: Vec::new(),
        });
        self
    }

    /// Adds an image to a repository registered earlier; unknown names are ignored.
    pub fn with_image(
        mut self,
        repository_name: &str,
        digest: &str,
        tags: &[&str],
        pushed_at: DateTime<Utc>,
    ) -> Self {
        if let Some(stored) = self
            .repositories
            .iter_mut()
            .find(|stored| stored.repository.name == repository_name)
        {
            stored.images.push(ImageDetail::new(
                digest,
                tags.iter().map(|tag| tag.to_string()).collect(),
                pushed_at,
            ));
        }
        self
    }

    pub fn deletes(&self) -> Vec<DeleteCall> {
        self.deletes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.calls()
    }

    fn find(
        &self,
        operation: &'static str,
        predicate: impl Fn(&Repository) -> bool,
    ) -> Result<&StoredRepository, ClientError> {
        self.repositories
            .iter()
            .find(|stored| predicate(&stored.repository))
            .ok_or_else(|| ClientError::new(operation, "repository not found"))
    }
}

#[async_trait]
impl RegistryClient for InMemoryRegistry {
    async fn describe_repositories(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<Repository>, ClientError> {
        const OP: &str = "ecr:DescribeRepositories";
        self.log.record(OP)?;
        let repositories: Vec<Repository> = self
            .repositories
            .iter()
            .map(|stored| stored.repository.clone())
            .collect();
        paginate(&repositories, self.page_size, next_token, OP)
    }

    async fn describe_images(
        &self,
        repository_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<ImageDetail>, ClientError> {
        const OP: &str = "ecr:DescribeImages";
        self.log.record(OP)?;
        let stored = self.find(OP, |repository| repository.name == repository_name)?;
        paginate(&stored.images, self.page_size, next_token, OP)
    }

    async fn list_tags_for_resource(
        &self,
        repository_arn: &str,
    ) -> Result<HashMap<String, String>, ClientError> {
        const OP: &str = "ecr:ListTagsForResource";
        self.log.record(OP)?;
        let stored = self.find(OP, |repository| repository.arn == repository_arn)?;
        Ok(stored.tags.clone())
    }

    async fn batch_delete_image(
        &self,
        repository_name: &str,
        image: ImageIdentifier,
    ) -> Result<(), ClientError> {
        self.log.record("ecr:BatchDeleteImage")?;
        self.deletes.lock().unwrap_or_else(PoisonError::into_inner).push(DeleteCall {
            repository_name: repository_name.to_string(),
            image,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn images_are_paginated_per_repository() {
        let pushed_at = Utc.with_ymd_and_hms(2022, 8, 1, 0, 0, 0).unwrap();
        let registry = InMemoryRegistry::new()
            .with_repository("repo1", "repo1uri", &[])
            .with_image("repo1", "d1", &["v1"], pushed_at)
            .with_image("repo1", "d2", &[], pushed_at)
            .with_page_size(1);

        let first = registry.describe_images("repo1", None).await.unwrap();
        assert_eq!(first.items[0].digest, "d1");

        let second = registry
            .describe_images("repo1", first.next_token)
            .await
            .unwrap();
        assert_eq!(second.items[0].digest, "d2");
        assert_eq!(second.next_token, None);
    }

    #[tokio::test]
    async fn tags_are_looked_up_by_arn() {
        let registry = InMemoryRegistry::new().with_repository(
            "repo1",
            "repo1uri",
            &[("BoxCleanerEnabled", "true")],
        );

        let repositories = registry.describe_repositories(None).await.unwrap();
        let tags = registry
            .list_tags_for_resource(&repositories.items[0].arn)
            .await
            .unwrap();

        assert_eq!(tags.get("BoxCleanerEnabled").map(String::as_str), Some("true"));
    }

    #[tokio::test]
    async fn delete_is_recorded() {
        let registry = InMemoryRegistry::new();
        registry
            .batch_delete_image("repo1", ImageIdentifier::Digest("d1".to_string()))
            .await
            .unwrap();

        assert_eq!(registry.deletes(), vec![DeleteCall::digest("repo1", "d1")]);
    }
}
