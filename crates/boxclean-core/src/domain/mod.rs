//! Domain model (references, usage set, policy, decisions, events, errors).

pub mod decision;
pub mod errors;
pub mod events;
pub mod policy;
pub mod reference;
pub mod registry;
pub mod usage;

pub use self::decision::{RetentionDecider, Verdict, image_age_days};
pub use self::errors::{CleanerError, ClientError};
pub use self::events::{CleanerEvent, ServiceFamily};
pub use self::policy::{ENABLED_TAG, KEEP_DAYS_TAG, KeepDaysSource, RepositoryPolicy};
pub use self::reference::{ImageIdentifier, ImageReference};
pub use self::registry::{ImageDetail, Repository};
pub use self::usage::UsageSet;
