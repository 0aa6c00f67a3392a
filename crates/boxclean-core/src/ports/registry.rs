//! RegistryClient port - コンテナレジストリ（ECR）
//!
//! 削除対象の列挙と削除を行う唯一のポートです。

use std::collections::HashMap;

use async_trait::async_trait;

use super::Page;
use crate::domain::{ClientError, ImageDetail, ImageIdentifier, Repository};

#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn describe_repositories(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<Repository>, ClientError>;

    async fn describe_images(
        &self,
        repository_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<ImageDetail>, ClientError>;

    /// Resource tags of a repository, keyed by tag name.
    async fn list_tags_for_resource(
        &self,
        repository_arn: &str,
    ) -> Result<HashMap<String, String>, ClientError>;

    /// Deletes exactly one image, addressed by tag or by digest.
    async fn batch_delete_image(
        &self,
        repository_name: &str,
        image: ImageIdentifier,
    ) -> Result<(), ClientError>;
}
