//! ECS implementation of ClusterClient.

use async_trait::async_trait;
use aws_sdk_ecs::Client;

use boxclean_core::ClientError;
use boxclean_core::ports::{ClusterClient, ClusterService, Page};

use crate::{required, sdk_error};

#[derive(Debug, Clone)]
pub struct EcsClusters {
    client: Client,
}

impl EcsClusters {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterClient for EcsClusters {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<String>, ClientError> {
        let output = self
            .client
            .list_clusters()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| sdk_error("ecs:ListClusters", err))?;

        Ok(Page::new(
            output.cluster_arns().to_vec(),
            output.next_token().map(str::to_string),
        ))
    }

    async fn list_services(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ClientError> {
        let output = self
            .client
            .list_services()
            .cluster(cluster)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| sdk_error("ecs:ListServices", err))?;

        Ok(Page::new(
            output.service_arns().to_vec(),
            output.next_token().map(str::to_string),
        ))
    }

    async fn describe_services(
        &self,
        cluster: &str,
        service_arns: &[String],
    ) -> Result<Vec<ClusterService>, ClientError> {
        const OP: &str = "ecs:DescribeServices";
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(service_arns.to_vec()))
            .send()
            .await
            .map_err(|err| sdk_error(OP, err))?;

        output
            .services()
            .iter()
            .map(|service| -> Result<ClusterService, ClientError> {
                Ok(ClusterService {
                    name: required(OP, "serviceName", service.service_name())?.to_string(),
                    task_definition: service.task_definition().map(str::to_string),
                })
            })
            .collect()
    }

    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<Vec<String>, ClientError> {
        const OP: &str = "ecs:DescribeTaskDefinition";
        let output = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .send()
            .await
            .map_err(|err| sdk_error(OP, err))?;

        let definition = output
            .task_definition()
            .ok_or_else(|| ClientError::new(OP, format!("no task definition for {task_definition}")))?;

        definition
            .container_definitions()
            .iter()
            .map(|container| required(OP, "image", container.image()).map(str::to_string))
            .collect()
    }
}
