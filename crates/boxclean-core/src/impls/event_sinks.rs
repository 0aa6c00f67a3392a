//! EventSink implementations.
//!
//! - TracingEventSink: 本番用。イベントを tracing の構造化ログに変換
//! - RecordingEventSink: テスト用。イベントをそのまま溜める

use std::sync::{Mutex, PoisonError};

use crate::domain::CleanerEvent;
use crate::ports::EventSink;

/// Writes every event as a structured `tracing` record.
///
/// Per-image decisions go to `debug`, anything an operator acts on goes to `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: CleanerEvent) {
        match event {
            CleanerEvent::UsedImageFound {
                family,
                image,
                owner,
            } => {
                tracing::debug!(%family, %image, %owner, "found used image");
            }
            CleanerEvent::ServiceUnavailable { family, region } => {
                tracing::info!(%family, %region, "service not available in this region");
            }
            CleanerEvent::UsageSetBuilt { images } => {
                tracing::info!(used_images = images, "found used images");
            }
            CleanerEvent::RepositorySkipped { repository } => {
                tracing::debug!(%repository, "repository not enabled for cleaning");
            }
            CleanerEvent::PolicyResolved { repository, policy } => {
                tracing::debug!(
                    %repository,
                    keep_days = policy.keep_days,
                    keep_days_source = ?policy.keep_days_source,
                    "resolved repository policy"
                );
            }
            CleanerEvent::ImageRetained {
                repository,
                digest,
                age_days,
                keep_days,
            } => {
                tracing::debug!(%repository, %digest, age_days, keep_days, "image is young");
            }
            CleanerEvent::ReferenceRetained {
                reference,
                image_id,
            } => {
                tracing::info!(image_reference = %reference, %image_id, "found old image in use");
            }
            CleanerEvent::UnusedImageFound { reference, dry_run } => {
                if dry_run {
                    tracing::info!(image_reference = %reference, "found unused image, should be removed");
                } else {
                    tracing::info!(image_reference = %reference, "found unused image, removing");
                }
            }
            CleanerEvent::ImageDeleted { reference } => {
                tracing::debug!(image_reference = %reference, "image removed");
            }
            CleanerEvent::RunCompleted {
                repositories_scanned,
                references_removed,
                dry_run,
            } => {
                tracing::info!(
                    repositories_scanned,
                    references_removed,
                    dry_run,
                    "cleaning completed"
                );
            }
        }
    }
}

/// Keeps every emitted event in order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<CleanerEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CleanerEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: CleanerEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}
