//! Errors - 実行を中断させるエラー
//!
//! 一覧取得・詳細取得・削除の失敗はすべて致命的（fail-closed）。
//! 途中までの UsageSet で判断することはありません。

use thiserror::Error;

use super::events::ServiceFamily;
use super::reference::ImageIdentifier;

/// Error returned by any port implementation.
///
/// `operation` names the remote call, e.g. `ecr:DescribeImages`.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct ClientError {
    pub operation: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ClientError {
    pub fn new(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("error getting images used by {family}")]
    UsedImages {
        family: ServiceFamily,
        #[source]
        source: ClientError,
    },

    #[error("error checking if {family} is available in region {region}")]
    Availability {
        family: ServiceFamily,
        region: String,
        #[source]
        source: ClientError,
    },

    #[error("cannot list repositories")]
    ListRepositories(#[source] ClientError),

    #[error("cannot list tags for repository {repository}")]
    RepositoryTags {
        repository: String,
        #[source]
        source: ClientError,
    },

    #[error("cannot list images in repository {repository}")]
    ListImages {
        repository: String,
        #[source]
        source: ClientError,
    },

    #[error("cannot remove image {image} ({identifier}) from repository {repository}")]
    DeleteImage {
        repository: String,
        image: String,
        identifier: ImageIdentifier,
        #[source]
        source: ClientError,
    },
}

pub type Result<T, E = CleanerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn delete_error_names_repository_and_image() {
        let err = CleanerError::DeleteImage {
            repository: "repo1".to_string(),
            image: "repo1uri:v1".to_string(),
            identifier: ImageIdentifier::Tag("v1".to_string()),
            source: ClientError::new("ecr:BatchDeleteImage", "access denied"),
        };

        let msg = err.to_string();
        assert!(msg.contains("repo1"));
        assert!(msg.contains("repo1uri:v1"));

        let source = err.source().unwrap().to_string();
        assert!(source.contains("ecr:BatchDeleteImage"));
        assert!(source.contains("access denied"));
    }
}
