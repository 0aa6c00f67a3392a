//! Executor - 未使用と判断された参照の削除
//!
//! dry-run ではログに出すだけで、レジストリへの変更呼び出しは一切しません。
//! 削除の失敗は実行全体を止めます（リトライしない）。

use std::sync::Arc;

use crate::domain::errors::Result;
use crate::domain::{CleanerError, CleanerEvent, ImageReference};
use crate::ports::{EventSink, RegistryClient};

/// What the executor did with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    DryRun,
    Deleted,
}

pub struct Executor {
    registry: Arc<dyn RegistryClient>,
    events: Arc<dyn EventSink>,
    dry_run: bool,
}

impl Executor {
    pub fn new(registry: Arc<dyn RegistryClient>, events: Arc<dyn EventSink>, dry_run: bool) -> Self {
        Self {
            registry,
            events,
            dry_run,
        }
    }

    pub async fn delete(&self, reference: &ImageReference) -> Result<Removal> {
        self.events.emit(CleanerEvent::UnusedImageFound {
            reference: reference.clone(),
            dry_run: self.dry_run,
        });

        if self.dry_run {
            return Ok(Removal::DryRun);
        }

        let identifier = reference.image_identifier();
        self.registry
            .batch_delete_image(&reference.repository_name, identifier.clone())
            .await
            .map_err(|source| CleanerError::DeleteImage {
                repository: reference.repository_name.clone(),
                image: reference.to_string(),
                identifier,
                source,
            })?;

        self.events.emit(CleanerEvent::ImageDeleted {
            reference: reference.clone(),
        });
        Ok(Removal::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{DeleteCall, InMemoryRegistry, RecordingEventSink};
    use crate::ports::NoopEventSink;

    #[tokio::test]
    async fn dry_run_issues_no_registry_calls() {
        let registry = Arc::new(InMemoryRegistry::new());
        let executor = Executor::new(registry.clone(), Arc::new(NoopEventSink), true);

        let removal = executor
            .delete(&ImageReference::tagged("repo1", "repo1uri", "d1", "v1"))
            .await
            .unwrap();

        assert_eq!(removal, Removal::DryRun);
        assert!(registry.calls().is_empty());
    }

    #[tokio::test]
    async fn deletes_by_tag_or_digest() {
        let registry = Arc::new(InMemoryRegistry::new());
        let executor = Executor::new(registry.clone(), Arc::new(NoopEventSink), false);

        executor
            .delete(&ImageReference::tagged("repo1", "repo1uri", "d1", "v1"))
            .await
            .unwrap();
        executor
            .delete(&ImageReference::untagged("repo1", "repo1uri", "d2"))
            .await
            .unwrap();

        assert_eq!(
            registry.deletes(),
            vec![
                DeleteCall::tag("repo1", "v1"),
                DeleteCall::digest("repo1", "d2"),
            ]
        );
    }

    #[tokio::test]
    async fn remote_failure_carries_context() {
        let registry = Arc::new(InMemoryRegistry::new().failing_on("ecr:BatchDeleteImage"));
        let executor = Executor::new(registry, Arc::new(NoopEventSink), false);

        let err = executor
            .delete(&ImageReference::tagged("repo1", "repo1uri", "d1", "v1"))
            .await
            .unwrap_err();

        match err {
            CleanerError::DeleteImage {
                repository, image, ..
            } => {
                assert_eq!(repository, "repo1");
                assert_eq!(image, "repo1uri:v1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn failed_delete_is_not_reported_as_deleted() {
        let registry = Arc::new(InMemoryRegistry::new().failing_on("ecr:BatchDeleteImage"));
        let events = Arc::new(RecordingEventSink::new());
        let executor = Executor::new(registry, events.clone(), false);

        let result = executor
            .delete(&ImageReference::tagged("repo1", "repo1uri", "d1", "v1"))
            .await;

        assert!(result.is_err());
        assert!(matches!(
            events.events().as_slice(),
            [CleanerEvent::UnusedImageFound { dry_run: false, .. }]
        ));
    }
}
