//! ECR implementation of RegistryClient.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_ecr::Client;
use aws_sdk_ecr::primitives::DateTime as SdkDateTime;
use aws_sdk_ecr::types::{ImageFailure, ImageIdentifier as EcrImageIdentifier};
use chrono::{DateTime, Utc};

use boxclean_core::domain::{ImageDetail, ImageIdentifier, Repository};
use boxclean_core::ports::{Page, RegistryClient};
use boxclean_core::ClientError;

use crate::{required, sdk_error};

#[derive(Debug, Clone)]
pub struct EcrRegistry {
    client: Client,
}

impl EcrRegistry {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Converts an SDK timestamp; `None` when it is outside chrono's range.
pub(crate) fn to_chrono(timestamp: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

#[async_trait]
impl RegistryClient for EcrRegistry {
    async fn describe_repositories(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<Repository>, ClientError> {
        const OP: &str = "ecr:DescribeRepositories";
        let output = self
            .client
            .describe_repositories()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| sdk_error(OP, err))?;

        let repositories = output
            .repositories()
            .iter()
            .map(|repository| -> Result<Repository, ClientError> {
                Ok(Repository::new(
                    required(OP, "repositoryName", repository.repository_name())?,
                    required(OP, "repositoryArn", repository.repository_arn())?,
                    required(OP, "repositoryUri", repository.repository_uri())?,
                ))
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(Page::new(
            repositories,
            output.next_token().map(str::to_string),
        ))
    }

    async fn describe_images(
        &self,
        repository_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<ImageDetail>, ClientError> {
        const OP: &str = "ecr:DescribeImages";
        let output = self
            .client
            .describe_images()
            .repository_name(repository_name)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| sdk_error(OP, err))?;

        let images = output
            .image_details()
            .iter()
            .map(|detail| -> Result<ImageDetail, ClientError> {
                let digest = required(OP, "imageDigest", detail.image_digest())?;
                let pushed_at = detail
                    .image_pushed_at()
                    .and_then(to_chrono)
                    .ok_or_else(|| {
                        ClientError::new(OP, format!("image {digest} has no usable imagePushedAt"))
                    })?;
                Ok(ImageDetail::new(
                    digest,
                    detail.image_tags().to_vec(),
                    pushed_at,
                ))
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(Page::new(images, output.next_token().map(str::to_string)))
    }

    async fn list_tags_for_resource(
        &self,
        repository_arn: &str,
    ) -> Result<HashMap<String, String>, ClientError> {
        let output = self
            .client
            .list_tags_for_resource()
            .resource_arn(repository_arn)
            .send()
            .await
            .map_err(|err| sdk_error("ecr:ListTagsForResource", err))?;

        Ok(output
            .tags()
            .iter()
            .map(|tag| (tag.key().to_string(), tag.value().to_string()))
            .collect())
    }

    async fn batch_delete_image(
        &self,
        repository_name: &str,
        image: ImageIdentifier,
    ) -> Result<(), ClientError> {
        let image_id = match image {
            ImageIdentifier::Tag(tag) => EcrImageIdentifier::builder().image_tag(tag).build(),
            ImageIdentifier::Digest(digest) => {
                EcrImageIdentifier::builder().image_digest(digest).build()
            }
        };

        let output = self
            .client
            .batch_delete_image()
            .repository_name(repository_name)
            .image_ids(image_id)
            .send()
            .await
            .map_err(|err| sdk_error("ecr:BatchDeleteImage", err))?;

        check_deletion(output.failures())
    }
}

/// Any per-image failure means the image is still in the registry.
pub(crate) fn check_deletion(failures: &[ImageFailure]) -> Result<(), ClientError> {
    for failure in failures {
        tracing::warn!(
            image = ?failure.image_id(),
            code = ?failure.failure_code(),
            reason = failure.failure_reason().unwrap_or_default(),
            "registry refused to delete image"
        );
    }
    let Some(failure) = failures.first() else {
        return Ok(());
    };
    let code = failure
        .failure_code()
        .map(|code| code.as_str())
        .unwrap_or("Unknown");
    Err(ClientError::new(
        "ecr:BatchDeleteImage",
        format!(
            "{code}: {}",
            failure.failure_reason().unwrap_or("no reason given")
        ),
    ))
}
