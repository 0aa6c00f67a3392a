//! Lambda - コンテナイメージでデプロイされた関数
//!
//! zip パッケージの関数はレジストリを参照しないので get_function しない。

use std::sync::Arc;

use async_trait::async_trait;

use super::UsageSource;
use crate::domain::{CleanerEvent, ClientError, ServiceFamily, UsageSet};
use crate::ports::{EventSink, FunctionClient, PackageType};

pub struct LambdaUsageSource {
    client: Arc<dyn FunctionClient>,
}

impl LambdaUsageSource {
    pub fn new(client: Arc<dyn FunctionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UsageSource for LambdaUsageSource {
    fn family(&self) -> ServiceFamily {
        ServiceFamily::Lambda
    }

    async fn collect(
        &self,
        usage: &mut UsageSet,
        events: &dyn EventSink,
    ) -> Result<(), ClientError> {
        let mut next_token = None;
        loop {
            let page = self.client.list_functions(next_token).await?;

            for function in page
                .items
                .iter()
                .filter(|f| f.package_type == PackageType::Image)
            {
                let image = self.client.get_function_image(&function.arn).await?;
                events.emit(CleanerEvent::UsedImageFound {
                    family: ServiceFamily::Lambda,
                    image: image.clone(),
                    owner: function.name.clone(),
                });
                usage.insert(image);
            }

            let Some(token) = page.next_token else {
                break;
            };
            next_token = Some(token);
        }
        Ok(())
    }
}
