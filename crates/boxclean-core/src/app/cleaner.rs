//! Cleaner - レジストリを走査して未使用イメージを削除する
//!
//! # フロー
//! 1. UsageSet を作る（失敗したら何もせずに中断）
//! 2. リポジトリを列挙し、タグからポリシーを決める（opt-in でなければスキップ）
//! 3. 各イメージを年齢で判定し、古いものは tag / digest ごとに使用中か判定
//! 4. 未使用なら Executor に渡す（最初のエラーで実行全体を止める）

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::executor::Executor;
use crate::config::CleanerConfig;
use crate::domain::errors::Result;
use crate::domain::{
    CleanerError, CleanerEvent, ImageDetail, Repository, RepositoryPolicy, RetentionDecider,
    UsageSet, Verdict, image_age_days,
};
use crate::ports::{Clock, EventSink, RegistryClient};
use crate::usage::UsageSetBuilder;

/// Counters for one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub dry_run: bool,
    pub used_images: usize,
    pub repositories_scanned: usize,
    pub repositories_skipped: usize,
    pub images_scanned: usize,
    /// Images kept because they are inside the retention window.
    pub images_young: usize,
    /// Old references kept because a workload uses them.
    pub references_in_use: usize,
    /// References deleted, or that would be deleted in dry-run.
    pub references_removed: usize,
}

pub struct Cleaner {
    registry: Arc<dyn RegistryClient>,
    usage: UsageSetBuilder,
    executor: Executor,
    events: Arc<dyn EventSink>,
    config: CleanerConfig,
}

impl Cleaner {
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        usage: UsageSetBuilder,
        config: CleanerConfig,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let executor = Executor::new(registry.clone(), events.clone(), config.dry_run);
        Self {
            registry,
            usage,
            executor,
            events,
            config,
        }
    }

    pub async fn run(&self, clock: &dyn Clock) -> Result<CleanReport> {
        self.clean(clock.now()).await
    }

    /// One full pass over the registry, judging ages against `now`.
    pub async fn clean(&self, now: DateTime<Utc>) -> Result<CleanReport> {
        let usage = self.usage.build().await?;

        let mut report = CleanReport {
            dry_run: self.config.dry_run,
            used_images: usage.len(),
            ..CleanReport::default()
        };

        let mut next_token = None;
        loop {
            let page = self
                .registry
                .describe_repositories(next_token)
                .await
                .map_err(CleanerError::ListRepositories)?;

            for repository in &page.items {
                self.process_repository(repository, &usage, now, &mut report)
                    .await?;
            }

            let Some(token) = page.next_token else {
                break;
            };
            next_token = Some(token);
        }

        self.events.emit(CleanerEvent::RunCompleted {
            repositories_scanned: report.repositories_scanned,
            references_removed: report.references_removed,
            dry_run: report.dry_run,
        });

        Ok(report)
    }

    async fn process_repository(
        &self,
        repository: &Repository,
        usage: &UsageSet,
        now: DateTime<Utc>,
        report: &mut CleanReport,
    ) -> Result<()> {
        let tags = self
            .registry
            .list_tags_for_resource(&repository.arn)
            .await
            .map_err(|source| CleanerError::RepositoryTags {
                repository: repository.name.clone(),
                source,
            })?;

        let policy = RepositoryPolicy::from_tags(&tags, self.config.default_keep_days);
        if !policy.enabled {
            report.repositories_skipped += 1;
            self.events.emit(CleanerEvent::RepositorySkipped {
                repository: repository.name.clone(),
            });
            return Ok(());
        }

        report.repositories_scanned += 1;
        let decider = RetentionDecider::new(usage, policy.keep_days);
        self.events.emit(CleanerEvent::PolicyResolved {
            repository: repository.name.clone(),
            policy,
        });

        let mut next_token = None;
        loop {
            let page = self
                .registry
                .describe_images(&repository.name, next_token)
                .await
                .map_err(|source| CleanerError::ListImages {
                    repository: repository.name.clone(),
                    source,
                })?;

            for image in &page.items {
                self.process_image(repository, image, &decider, now, report)
                    .await?;
            }

            let Some(token) = page.next_token else {
                break;
            };
            next_token = Some(token);
        }
        Ok(())
    }

    async fn process_image(
        &self,
        repository: &Repository,
        image: &ImageDetail,
        decider: &RetentionDecider<'_>,
        now: DateTime<Utc>,
        report: &mut CleanReport,
    ) -> Result<()> {
        report.images_scanned += 1;

        let age_days = image_age_days(now, image.pushed_at);
        if !decider.is_old(age_days) {
            report.images_young += 1;
            self.events.emit(CleanerEvent::ImageRetained {
                repository: repository.name.clone(),
                digest: image.digest.clone(),
                age_days,
                keep_days: decider.keep_days(),
            });
            return Ok(());
        }

        // each tag is its own candidate; siblings never block or imply each other
        for reference in image.candidates(repository) {
            match decider.usage_verdict(&reference) {
                Verdict::Retain { image_id } => {
                    report.references_in_use += 1;
                    self.events.emit(CleanerEvent::ReferenceRetained {
                        reference,
                        image_id,
                    });
                }
                Verdict::Delete => {
                    self.executor.delete(&reference).await?;
                    report.references_removed += 1;
                }
            }
        }
        Ok(())
    }
}
