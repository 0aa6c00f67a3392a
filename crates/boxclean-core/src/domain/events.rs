//! Events - 実行中の判断を記録するイベント
//!
//! ログ出力は EventSink に委譲し、制御フローには影響させません。

use serde::Serialize;

use super::policy::RepositoryPolicy;
use super::reference::ImageReference;

/// Compute service family contributing to the usage set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFamily {
    Ecs,
    Lambda,
    AppRunner,
}

impl ServiceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceFamily::Ecs => "ECS",
            ServiceFamily::Lambda => "Lambda",
            ServiceFamily::AppRunner => "App Runner",
        }
    }
}

impl std::fmt::Display for ServiceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum CleanerEvent {
    UsedImageFound {
        family: ServiceFamily,
        image: String,
        /// Service or function name that references the image.
        owner: String,
    },
    ServiceUnavailable {
        family: ServiceFamily,
        region: String,
    },
    UsageSetBuilt {
        images: usize,
    },
    RepositorySkipped {
        repository: String,
    },
    PolicyResolved {
        repository: String,
        policy: RepositoryPolicy,
    },
    /// Inside the retention window; none of its references are considered.
    ImageRetained {
        repository: String,
        digest: String,
        age_days: f64,
        keep_days: i64,
    },
    /// Old, but a workload uses it through `image_id`.
    ReferenceRetained {
        reference: ImageReference,
        image_id: String,
    },
    UnusedImageFound {
        reference: ImageReference,
        dry_run: bool,
    },
    ImageDeleted {
        reference: ImageReference,
    },
    RunCompleted {
        repositories_scanned: usize,
        references_removed: usize,
        dry_run: bool,
    },
}
