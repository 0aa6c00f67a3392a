//! ClusterClient port - クラスタ型オーケストレーション（ECS）

use async_trait::async_trait;

use super::Page;
use crate::domain::ClientError;

/// A service as returned by describe-services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterService {
    pub name: String,
    /// Active task definition, if the service has one.
    pub task_definition: Option<String>,
}

#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<String>, ClientError>;

    async fn list_services(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ClientError>;

    async fn describe_services(
        &self,
        cluster: &str,
        service_arns: &[String],
    ) -> Result<Vec<ClusterService>, ClientError>;

    /// Image of every container in the task definition.
    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<Vec<String>, ClientError>;
}
