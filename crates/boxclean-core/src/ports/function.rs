//! FunctionClient port - Function-as-a-service（Lambda）

use async_trait::async_trait;

use super::Page;
use crate::domain::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageType {
    Image,
    Zip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSummary {
    pub name: String,
    pub arn: String,
    pub package_type: PackageType,
}

#[async_trait]
pub trait FunctionClient: Send + Sync {
    async fn list_functions(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<FunctionSummary>, ClientError>;

    /// Image URI of an image-packaged function. A response without one is an error.
    async fn get_function_image(&self, function_arn: &str) -> Result<String, ClientError>;
}
