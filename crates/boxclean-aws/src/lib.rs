//! boxclean-aws
//!
//! AWS SDK による ports の本番用実装。
//!
//! # 含まれる実装
//! - **EcrRegistry**: RegistryClient（ECR）
//! - **EcsClusters**: ClusterClient（ECS）
//! - **LambdaFunctions**: FunctionClient（Lambda）
//! - **AppRunnerServices**: AppServiceClient（App Runner）
//! - **SsmParameters**: ParameterStore（SSM）
//!
//! どの実装も SDK のエラーを `ClientError` に包み、呼び出し名（`ecr:DescribeImages` など）を付けます。

pub mod apprunner;
pub mod ecr;
pub mod ecs;
pub mod lambda;
pub mod ssm;

pub use self::apprunner::AppRunnerServices;
pub use self::ecr::EcrRegistry;
pub use self::ecs::EcsClusters;
pub use self::lambda::LambdaFunctions;
pub use self::ssm::SsmParameters;

use aws_config::BehaviorVersion;
use aws_sdk_ecr::error::DisplayErrorContext;
use aws_types::SdkConfig;
use aws_types::region::Region;
use boxclean_core::ClientError;

/// Every client the cleaner needs, built from one shared SDK configuration.
pub struct AwsClients {
    pub region: String,
    pub ecr: EcrRegistry,
    pub ecs: EcsClusters,
    pub lambda: LambdaFunctions,
    pub app_runner: AppRunnerServices,
    pub ssm: SsmParameters,
}

impl AwsClients {
    /// Loads the default credential and region chain, optionally pinning the region.
    pub async fn load(region: Option<String>) -> Result<Self, ClientError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        Self::from_conf(&config)
    }

    pub fn from_conf(config: &SdkConfig) -> Result<Self, ClientError> {
        let region = config
            .region()
            .map(ToString::to_string)
            .ok_or_else(|| ClientError::new("aws:LoadConfig", "no AWS region configured"))?;

        Ok(Self {
            region,
            ecr: EcrRegistry::new(aws_sdk_ecr::Client::new(config)),
            ecs: EcsClusters::new(aws_sdk_ecs::Client::new(config)),
            lambda: LambdaFunctions::new(aws_sdk_lambda::Client::new(config)),
            app_runner: AppRunnerServices::new(aws_sdk_apprunner::Client::new(config)),
            ssm: SsmParameters::new(aws_sdk_ssm::Client::new(config)),
        })
    }
}

/// Wraps an SDK error, keeping the full error context in the message.
pub(crate) fn sdk_error<E>(operation: &'static str, err: E) -> ClientError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ClientError::new(operation, DisplayErrorContext(&err).to_string())
}

/// A field the API documents as always present.
pub(crate) fn required<'a>(
    operation: &'static str,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ClientError> {
    value.ok_or_else(|| ClientError::new(operation, format!("response is missing {field}")))
}
