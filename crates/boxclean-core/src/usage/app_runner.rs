//! App Runner - イメージリポジトリからデプロイされたサービス
//!
//! App Runner は全リージョンで提供されているわけではないので、
//! SSM の公開パラメータで現在のリージョンが含まれるかを先に確認します。

use std::sync::Arc;

use async_trait::async_trait;

use super::{Availability, UsageSource};
use crate::domain::errors::Result;
use crate::domain::{CleanerError, CleanerEvent, ClientError, ServiceFamily, UsageSet};
use crate::ports::{AppServiceClient, EventSink, ParameterStore};

/// Public parameter path listing every region App Runner is offered in.
pub const APP_RUNNER_REGIONS_PATH: &str =
    "/aws/service/global-infrastructure/services/apprunner/regions";

pub struct AppRunnerUsageSource {
    client: Arc<dyn AppServiceClient>,
    parameters: Arc<dyn ParameterStore>,
    region: String,
}

impl AppRunnerUsageSource {
    pub fn new(
        client: Arc<dyn AppServiceClient>,
        parameters: Arc<dyn ParameterStore>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            client,
            parameters,
            region: region.into(),
        }
    }

    async fn region_is_supported(&self) -> Result<bool, ClientError> {
        let mut next_token = None;
        loop {
            let page = self
                .parameters
                .get_parameters_by_path(APP_RUNNER_REGIONS_PATH, next_token)
                .await?;

            if page.items.iter().any(|region| *region == self.region) {
                return Ok(true);
            }

            let Some(token) = page.next_token else {
                return Ok(false);
            };
            next_token = Some(token);
        }
    }
}

#[async_trait]
impl UsageSource for AppRunnerUsageSource {
    fn family(&self) -> ServiceFamily {
        ServiceFamily::AppRunner
    }

    async fn availability(&self) -> Result<Availability> {
        let supported =
            self.region_is_supported()
                .await
                .map_err(|source| CleanerError::Availability {
                    family: ServiceFamily::AppRunner,
                    region: self.region.clone(),
                    source,
                })?;

        if supported {
            Ok(Availability::Available)
        } else {
            Ok(Availability::Unavailable {
                region: self.region.clone(),
            })
        }
    }

    async fn collect(
        &self,
        usage: &mut UsageSet,
        events: &dyn EventSink,
    ) -> Result<(), ClientError> {
        let mut next_token = None;
        loop {
            let page = self.client.list_services(next_token).await?;

            for service in &page.items {
                // code-based services are built by App Runner itself
                let Some(image) = self.client.describe_service_image(&service.arn).await? else {
                    continue;
                };

                events.emit(CleanerEvent::UsedImageFound {
                    family: ServiceFamily::AppRunner,
                    image: image.clone(),
                    owner: service.name.clone(),
                });
                usage.insert(image);
            }

            let Some(token) = page.next_token else {
                break;
            };
            next_token = Some(token);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{InMemoryAppServices, InMemoryParameters};
    use crate::ports::NoopEventSink;

    fn regions() -> InMemoryParameters {
        InMemoryParameters::new()
            .with_parameters(APP_RUNNER_REGIONS_PATH, &["us-east-1", "eu-west-1", "ap-northeast-1"])
            .with_page_size(1)
    }

    #[tokio::test]
    async fn available_when_region_is_listed() {
        let source = AppRunnerUsageSource::new(
            Arc::new(InMemoryAppServices::new()),
            Arc::new(regions()),
            "eu-west-1",
        );

        assert_eq!(source.availability().await.unwrap(), Availability::Available);
    }

    #[tokio::test]
    async fn unavailable_when_region_is_missing() {
        let source = AppRunnerUsageSource::new(
            Arc::new(InMemoryAppServices::new()),
            Arc::new(regions()),
            "eu-south-2",
        );

        assert_eq!(
            source.availability().await.unwrap(),
            Availability::Unavailable {
                region: "eu-south-2".to_string()
            }
        );
    }

    #[tokio::test]
    async fn region_lookup_failure_is_an_error() {
        let source = AppRunnerUsageSource::new(
            Arc::new(InMemoryAppServices::new()),
            Arc::new(regions().failing_on("ssm:GetParametersByPath")),
            "eu-west-1",
        );

        let err = source.availability().await.unwrap_err();
        assert!(matches!(
            err,
            CleanerError::Availability {
                family: ServiceFamily::AppRunner,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn code_based_services_are_skipped() {
        let services = InMemoryAppServices::new()
            .with_image_service("web", "repo1uri:v1")
            .with_code_service("docs")
            .with_page_size(1);
        let source = AppRunnerUsageSource::new(Arc::new(services), Arc::new(regions()), "eu-west-1");

        let mut usage = UsageSet::new();
        source.collect(&mut usage, &NoopEventSink).await.unwrap();

        let expected: UsageSet = ["repo1uri:v1"].into_iter().collect();
        assert_eq!(usage, expected);
    }
}
