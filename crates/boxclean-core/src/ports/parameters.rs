//! ParameterStore port - パラメータストア（SSM）
//!
//! App Runner の提供リージョン一覧を取得するためだけに使います。

use async_trait::async_trait;

use super::Page;
use crate::domain::ClientError;

#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Values of the parameters under `path`.
    async fn get_parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ClientError>;
}
