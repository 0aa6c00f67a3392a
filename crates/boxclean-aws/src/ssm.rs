//! SSM implementation of ParameterStore.

use async_trait::async_trait;
use aws_sdk_ssm::Client;

use boxclean_core::ClientError;
use boxclean_core::ports::{Page, ParameterStore};

use crate::sdk_error;

#[derive(Debug, Clone)]
pub struct SsmParameters {
    client: Client,
}

impl SsmParameters {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameters {
    async fn get_parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ClientError> {
        let output = self
            .client
            .get_parameters_by_path()
            .path(path)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| sdk_error("ssm:GetParametersByPath", err))?;

        let values = output
            .parameters()
            .iter()
            .filter_map(|parameter| parameter.value())
            .map(str::to_string)
            .collect();

        Ok(Page::new(values, output.next_token().map(str::to_string)))
    }
}
