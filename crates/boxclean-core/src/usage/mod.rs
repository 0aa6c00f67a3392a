//! Usage - 稼働中イメージの収集（UsageSet Builder）
//!
//! サービスファミリーごとに `UsageSource` を実装し、`UsageSetBuilder` が
//! 登録順に実行して 1 つの `UsageSet` にまとめます。
//!
//! # 設計原則
//! - fail-closed: どれか 1 つでも失敗したら実行全体を中断する
//!   （不完全な集合で「未使用」と判断するのが危険側）
//! - 提供されていないリージョンのサービスはスキップ（エラーではない）

pub mod app_runner;
pub mod ecs;
pub mod lambda;

pub use self::app_runner::{APP_RUNNER_REGIONS_PATH, AppRunnerUsageSource};
pub use self::ecs::EcsUsageSource;
pub use self::lambda::LambdaUsageSource;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::Result;
use crate::domain::{CleanerError, CleanerEvent, ClientError, ServiceFamily, UsageSet};
use crate::ports::EventSink;

/// Whether a service family is offered in the current region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable { region: String },
}

/// A producer of image references for one compute service family.
#[async_trait]
pub trait UsageSource: Send + Sync {
    fn family(&self) -> ServiceFamily;

    /// Whether the service family is offered where we run.
    async fn availability(&self) -> Result<Availability> {
        Ok(Availability::Available)
    }

    /// Adds every image the family currently runs to `usage`.
    async fn collect(
        &self,
        usage: &mut UsageSet,
        events: &dyn EventSink,
    ) -> Result<(), ClientError>;
}

/// Runs every registered source, in order, into one shared set.
pub struct UsageSetBuilder {
    sources: Vec<Box<dyn UsageSource>>,
    events: Arc<dyn EventSink>,
}

impl UsageSetBuilder {
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self {
            sources: Vec::new(),
            events,
        }
    }

    pub fn with_source(mut self, source: impl UsageSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Builds the usage set, or fails without returning a partial one.
    pub async fn build(&self) -> Result<UsageSet> {
        let mut usage = UsageSet::new();

        for source in &self.sources {
            let family = source.family();

            if let Availability::Unavailable { region } = source.availability().await? {
                self.events
                    .emit(CleanerEvent::ServiceUnavailable { family, region });
                continue;
            }

            source
                .collect(&mut usage, self.events.as_ref())
                .await
                .map_err(|source| CleanerError::UsedImages { family, source })?;
        }

        self.events.emit(CleanerEvent::UsageSetBuilt {
            images: usage.len(),
        });

        Ok(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::RecordingEventSink;
    use crate::ports::NoopEventSink;

    struct StaticSource {
        family: ServiceFamily,
        images: Vec<&'static str>,
        available: bool,
    }

    #[async_trait]
    impl UsageSource for StaticSource {
        fn family(&self) -> ServiceFamily {
            self.family
        }

        async fn availability(&self) -> Result<Availability> {
            if self.available {
                Ok(Availability::Available)
            } else {
                Ok(Availability::Unavailable {
                    region: "xx-test-1".to_string(),
                })
            }
        }

        async fn collect(
            &self,
            usage: &mut UsageSet,
            _events: &dyn EventSink,
        ) -> Result<(), ClientError> {
            usage.extend(self.images.iter().copied());
            Ok(())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl UsageSource for FailingSource {
        fn family(&self) -> ServiceFamily {
            ServiceFamily::Lambda
        }

        async fn collect(
            &self,
            _usage: &mut UsageSet,
            _events: &dyn EventSink,
        ) -> Result<(), ClientError> {
            Err(ClientError::new("lambda:ListFunctions", "throttled"))
        }
    }

    #[tokio::test]
    async fn duplicates_across_sources_collapse() {
        let builder = UsageSetBuilder::new(Arc::new(NoopEventSink))
            .with_source(StaticSource {
                family: ServiceFamily::Ecs,
                images: vec!["a:1", "b:1"],
                available: true,
            })
            .with_source(StaticSource {
                family: ServiceFamily::Lambda,
                images: vec!["b:1", "c@d1"],
                available: true,
            });

        let usage = builder.build().await.unwrap();

        assert_eq!(usage.len(), 3);
        assert!(usage.contains("c@d1"));
    }

    #[tokio::test]
    async fn unavailable_source_is_skipped_and_reported() {
        let events = Arc::new(RecordingEventSink::new());
        let builder = UsageSetBuilder::new(events.clone()).with_source(StaticSource {
            family: ServiceFamily::AppRunner,
            images: vec!["a:1"],
            available: false,
        });

        let usage = builder.build().await.unwrap();

        assert!(usage.is_empty());
        assert!(events.events().contains(&CleanerEvent::ServiceUnavailable {
            family: ServiceFamily::AppRunner,
            region: "xx-test-1".to_string(),
        }));
    }

    #[tokio::test]
    async fn failing_source_aborts_the_build() {
        let builder = UsageSetBuilder::new(Arc::new(NoopEventSink))
            .with_source(StaticSource {
                family: ServiceFamily::Ecs,
                images: vec!["a:1"],
                available: true,
            })
            .with_source(FailingSource);

        let err = builder.build().await.unwrap_err();

        assert!(matches!(
            err,
            CleanerError::UsedImages {
                family: ServiceFamily::Lambda,
                ..
            }
        ));
    }
}
