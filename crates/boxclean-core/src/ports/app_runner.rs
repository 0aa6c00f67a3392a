//! AppServiceClient port - マネージドコンテナサービス（App Runner）

use async_trait::async_trait;

use super::Page;
use crate::domain::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppServiceSummary {
    pub name: String,
    pub arn: String,
}

#[async_trait]
pub trait AppServiceClient: Send + Sync {
    async fn list_services(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<AppServiceSummary>, ClientError>;

    /// Image identifier when the service is deployed from an image
    /// repository; `None` for source-code deployments.
    async fn describe_service_image(
        &self,
        service_arn: &str,
    ) -> Result<Option<String>, ClientError>;
}
