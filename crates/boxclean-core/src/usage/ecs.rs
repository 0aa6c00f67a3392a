//! ECS - クラスタ上のサービスが使うイメージ
//!
//! clusters → services（ページ単位）→ describe services → task definition → containers

use std::sync::Arc;

use async_trait::async_trait;

use super::UsageSource;
use crate::domain::{CleanerEvent, ClientError, ServiceFamily, UsageSet};
use crate::ports::{ClusterClient, EventSink};

pub struct EcsUsageSource {
    client: Arc<dyn ClusterClient>,
}

impl EcsUsageSource {
    pub fn new(client: Arc<dyn ClusterClient>) -> Self {
        Self { client }
    }

    async fn collect_cluster(
        &self,
        cluster: &str,
        usage: &mut UsageSet,
        events: &dyn EventSink,
    ) -> Result<(), ClientError> {
        let mut next_token = None;
        loop {
            let page = self.client.list_services(cluster, next_token).await?;

            if !page.items.is_empty() {
                let services = self.client.describe_services(cluster, &page.items).await?;

                for service in services {
                    // draining services may have no active task definition
                    let Some(task_definition) = service.task_definition.as_deref() else {
                        continue;
                    };

                    let images = self.client.describe_task_definition(task_definition).await?;
                    for image in images {
                        events.emit(CleanerEvent::UsedImageFound {
                            family: ServiceFamily::Ecs,
                            image: image.clone(),
                            owner: service.name.clone(),
                        });
                        usage.insert(image);
                    }
                }
            }

            let Some(token) = page.next_token else {
                break;
            };
            next_token = Some(token);
        }
        Ok(())
    }
}

#[async_trait]
impl UsageSource for EcsUsageSource {
    fn family(&self) -> ServiceFamily {
        ServiceFamily::Ecs
    }

    async fn collect(
        &self,
        usage: &mut UsageSet,
        events: &dyn EventSink,
    ) -> Result<(), ClientError> {
        let mut next_token = None;
        loop {
            let page = self.client.list_clusters(next_token).await?;

            for cluster in &page.items {
                self.collect_cluster(cluster, usage, events).await?;
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
    use crate::impls::{InMemoryClusters, RecordingEventSink};
    use crate::ports::NoopEventSink;

    #[tokio::test]
    async fn collects_every_container_of_every_service() {
        let clusters = InMemoryClusters::new()
            .with_service("cluster-a", "api", Some("api:3"))
            .with_service("cluster-a", "worker", Some("worker:7"))
            .with_service("cluster-b", "batch", Some("api:3"))
            .with_task_definition("api:3", &["repo1uri:v1", "sidecar:1.0"])
            .with_task_definition("worker:7", &["repo2uri@sha256:d2"])
            .with_page_size(1);
        let source = EcsUsageSource::new(Arc::new(clusters));

        let mut usage = UsageSet::new();
        source.collect(&mut usage, &NoopEventSink).await.unwrap();

        let expected: UsageSet = ["repo1uri:v1", "sidecar:1.0", "repo2uri@sha256:d2"]
            .into_iter()
            .collect();
        assert_eq!(usage, expected);
    }

    #[tokio::test]
    async fn service_without_task_definition_is_ignored() {
        let clusters = InMemoryClusters::new()
            .with_service("cluster-a", "draining", None)
            .with_service("cluster-a", "api", Some("api:1"))
            .with_task_definition("api:1", &["repo1uri:v1"]);
        let source = EcsUsageSource::new(Arc::new(clusters));

        let mut usage = UsageSet::new();
        source.collect(&mut usage, &NoopEventSink).await.unwrap();

        assert_eq!(usage.len(), 1);
    }

    #[tokio::test]
    async fn empty_cluster_is_not_described() {
        let clusters = Arc::new(InMemoryClusters::new().with_cluster("empty"));
        let source = EcsUsageSource::new(clusters.clone());

        let mut usage = UsageSet::new();
        source.collect(&mut usage, &NoopEventSink).await.unwrap();

        assert!(usage.is_empty());
        assert!(
            !clusters
                .calls()
                .iter()
                .any(|call| call == "ecs:DescribeServices")
        );
    }

    #[tokio::test]
    async fn reports_owner_of_each_image() {
        let clusters = InMemoryClusters::new()
            .with_service("cluster-a", "api", Some("api:1"))
            .with_task_definition("api:1", &["repo1uri:v1"]);
        let source = EcsUsageSource::new(Arc::new(clusters));
        let events = RecordingEventSink::new();

        let mut usage = UsageSet::new();
        source.collect(&mut usage, &events).await.unwrap();

        assert_eq!(
            events.events(),
            vec![CleanerEvent::UsedImageFound {
                family: ServiceFamily::Ecs,
                image: "repo1uri:v1".to_string(),
                owner: "api".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn describe_failure_is_propagated() {
        let clusters = InMemoryClusters::new()
            .with_service("cluster-a", "api", Some("api:1"))
            .failing_on("ecs:DescribeTaskDefinition");
        let source = EcsUsageSource::new(Arc::new(clusters));

        let mut usage = UsageSet::new();
        let err = source.collect(&mut usage, &NoopEventSink).await.unwrap_err();

        assert_eq!(err.operation, "ecs:DescribeTaskDefinition");
    }
}
