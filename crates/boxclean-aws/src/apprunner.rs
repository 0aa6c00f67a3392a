//! App Runner implementation of AppServiceClient.

use async_trait::async_trait;
use aws_sdk_apprunner::Client;

use boxclean_core::ClientError;
use boxclean_core::ports::{AppServiceClient, AppServiceSummary, Page};

use crate::{required, sdk_error};

#[derive(Debug, Clone)]
pub struct AppRunnerServices {
    client: Client,
}

impl AppRunnerServices {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AppServiceClient for AppRunnerServices {
    async fn list_services(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<AppServiceSummary>, ClientError> {
        const OP: &str = "apprunner:ListServices";
        let output = self
            .client
            .list_services()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| sdk_error(OP, err))?;

        let services = output
            .service_summary_list()
            .iter()
            .map(|summary| -> Result<AppServiceSummary, ClientError> {
                Ok(AppServiceSummary {
                    name: required(OP, "ServiceName", summary.service_name())?.to_string(),
                    arn: required(OP, "ServiceArn", summary.service_arn())?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(Page::new(services, output.next_token().map(str::to_string)))
    }

    async fn describe_service_image(
        &self,
        service_arn: &str,
    ) -> Result<Option<String>, ClientError> {
        const OP: &str = "apprunner:DescribeService";
        let output = self
            .client
            .describe_service()
            .service_arn(service_arn)
            .send()
            .await
            .map_err(|err| sdk_error(OP, err))?;

        let service = output
            .service()
            .ok_or_else(|| ClientError::new(OP, format!("no service for {service_arn}")))?;

        Ok(service
            .source_configuration()
            .and_then(|source| source.image_repository())
            .map(|repository| repository.image_identifier().to_string()))
    }
}
