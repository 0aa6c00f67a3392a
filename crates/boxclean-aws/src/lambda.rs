//! Lambda implementation of FunctionClient.

use async_trait::async_trait;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::types::PackageType as LambdaPackageType;

use boxclean_core::ClientError;
use boxclean_core::ports::{FunctionClient, FunctionSummary, PackageType, Page};

use crate::{required, sdk_error};

#[derive(Debug, Clone)]
pub struct LambdaFunctions {
    client: Client,
}

impl LambdaFunctions {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionClient for LambdaFunctions {
    async fn list_functions(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<FunctionSummary>, ClientError> {
        const OP: &str = "lambda:ListFunctions";
        let output = self
            .client
            .list_functions()
            .set_marker(next_token)
            .send()
            .await
            .map_err(|err| sdk_error(OP, err))?;

        let functions = output
            .functions()
            .iter()
            .map(|function| -> Result<FunctionSummary, ClientError> {
                let package_type = match function.package_type() {
                    Some(LambdaPackageType::Image) => PackageType::Image,
                    _ => PackageType::Zip,
                };
                Ok(FunctionSummary {
                    name: required(OP, "FunctionName", function.function_name())?.to_string(),
                    arn: required(OP, "FunctionArn", function.function_arn())?.to_string(),
                    package_type,
                })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(Page::new(functions, output.next_marker().map(str::to_string)))
    }

    async fn get_function_image(&self, function_arn: &str) -> Result<String, ClientError> {
        const OP: &str = "lambda:GetFunction";
        let output = self
            .client
            .get_function()
            .function_name(function_arn)
            .send()
            .await
            .map_err(|err| sdk_error(OP, err))?;

        let image = output.code().and_then(|code| code.image_uri());
        Ok(required(OP, "Code.ImageUri", image)?.to_string())
    }
}
