//! InMemory compute clients - ECS / Lambda / App Runner / SSM の開発用実装
//!
//! どれも page_size と failing_on をサポートし、呼び出しを記録します。

use std::collections::HashMap;

use async_trait::async_trait;

use super::{CallLog, paginate};
use crate::domain::ClientError;
use crate::ports::{
    AppServiceClient, AppServiceSummary, ClusterClient, ClusterService, FunctionClient,
    FunctionSummary, PackageType, Page, ParameterStore,
};

const DEFAULT_PAGE_SIZE: usize = 100;

// ========================================
// ECS
// ========================================

#[derive(Debug, Clone)]
struct StoredService {
    arn: String,
    service: ClusterService,
}

#[derive(Debug)]
pub struct InMemoryClusters {
    /// Cluster ARN with its services, in insertion order.
    clusters: Vec<(String, Vec<StoredService>)>,
    task_definitions: HashMap<String, Vec<String>>,
    page_size: usize,
    log: CallLog,
}

impl InMemoryClusters {
    pub fn new() -> Self {
        Self {
            clusters: Vec::new(),
            task_definitions: HashMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            log: CallLog::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.log.fail_on(operation);
        self
    }

    pub fn with_cluster(mut self, cluster: &str) -> Self {
        self.cluster_mut(cluster);
        self
    }

    pub fn with_service(mut self, cluster: &str, name: &str, task_definition: Option<&str>) -> Self {
        let arn = format!("{cluster}/{name}");
        self.cluster_mut(cluster).push(StoredService {
            arn,
            service: ClusterService {
                name: name.to_string(),
                task_definition: task_definition.map(str::to_string),
            },
        });
        self
    }

    pub fn with_task_definition(mut self, task_definition: &str, images: &[&str]) -> Self {
        self.task_definitions.insert(
            task_definition.to_string(),
            images.iter().map(|image| image.to_string()).collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.calls()
    }

    fn cluster_mut(&mut self, cluster: &str) -> &mut Vec<StoredService> {
        let index = match self.clusters.iter().position(|(arn, _)| arn == cluster) {
            Some(index) => index,
            None => {
                self.clusters.push((cluster.to_string(), Vec::new()));
                self.clusters.len() - 1
            }
        };
        &mut self.clusters[index].1
    }

    fn services(&self, cluster: &str) -> &[StoredService] {
        self.clusters
            .iter()
            .find(|(arn, _)| arn == cluster)
            .map(|(_, services)| services.as_slice())
            .unwrap_or_default()
    }
}

impl Default for InMemoryClusters {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterClient for InMemoryClusters {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<String>, ClientError> {
        const OP: &str = "ecs:ListClusters";
        self.log.record(OP)?;
        let arns: Vec<String> = self.clusters.iter().map(|(arn, _)| arn.clone()).collect();
        paginate(&arns, self.page_size, next_token, OP)
    }

    async fn list_services(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ClientError> {
        const OP: &str = "ecs:ListServices";
        self.log.record(OP)?;
        let arns: Vec<String> = self
            .services(cluster)
            .iter()
            .map(|stored| stored.arn.clone())
            .collect();
        paginate(&arns, self.page_size, next_token, OP)
    }

    async fn describe_services(
        &self,
        cluster: &str,
        service_arns: &[String],
    ) -> Result<Vec<ClusterService>, ClientError> {
        self.log.record("ecs:DescribeServices")?;
        Ok(self
            .services(cluster)
            .iter()
            .filter(|stored| service_arns.contains(&stored.arn))
            .map(|stored| stored.service.clone())
            .collect())
    }

    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<Vec<String>, ClientError> {
        const OP: &str = "ecs:DescribeTaskDefinition";
        self.log.record(OP)?;
        self.task_definitions
            .get(task_definition)
            .cloned()
            .ok_or_else(|| ClientError::new(OP, format!("unknown task definition {task_definition}")))
    }
}

// ========================================
// Lambda
// ========================================

#[derive(Debug)]
pub struct InMemoryFunctions {
    functions: Vec<(FunctionSummary, Option<String>)>,
    page_size: usize,
    log: CallLog,
}

impl InMemoryFunctions {
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            log: CallLog::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.log.fail_on(operation);
        self
    }

    pub fn with_image_function(mut self, name: &str, image: &str) -> Self {
        self.functions
            .push((Self::summary(name, PackageType::Image), Some(image.to_string())));
        self
    }

    /// An image function whose GetFunction response carries no image URI.
    pub fn with_unresolved_image_function(mut self, name: &str) -> Self {
        self.functions.push((Self::summary(name, PackageType::Image), None));
        self
    }

    pub fn with_zip_function(mut self, name: &str) -> Self {
        self.functions.push((Self::summary(name, PackageType::Zip), None));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.calls()
    }

    fn summary(name: &str, package_type: PackageType) -> FunctionSummary {
        FunctionSummary {
            name: name.to_string(),
            arn: format!("arn:aws:lambda:us-east-1:000000000000:function:{name}"),
            package_type,
        }
    }
}

impl Default for InMemoryFunctions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FunctionClient for InMemoryFunctions {
    async fn list_functions(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<FunctionSummary>, ClientError> {
        const OP: &str = "lambda:ListFunctions";
        self.log.record(OP)?;
        let summaries: Vec<FunctionSummary> = self
            .functions
            .iter()
            .map(|(summary, _)| summary.clone())
            .collect();
        paginate(&summaries, self.page_size, next_token, OP)
    }

    async fn get_function_image(&self, function_arn: &str) -> Result<String, ClientError> {
        const OP: &str = "lambda:GetFunction";
        self.log.record(OP)?;
        let (_, image) = self
            .functions
            .iter()
            .find(|(summary, _)| summary.arn == function_arn)
            .ok_or_else(|| ClientError::new(OP, format!("function not found: {function_arn}")))?;
        image
            .clone()
            .ok_or_else(|| ClientError::new(OP, "response is missing Code.ImageUri"))
    }
}

// ========================================
// App Runner
// ========================================

#[derive(Debug)]
pub struct InMemoryAppServices {
    services: Vec<(AppServiceSummary, Option<String>)>,
    page_size: usize,
    log: CallLog,
}

impl InMemoryAppServices {
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            log: CallLog::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.log.fail_on(operation);
        self
    }

    pub fn with_image_service(mut self, name: &str, image: &str) -> Self {
        self.services
            .push((Self::summary(name), Some(image.to_string())));
        self
    }

    /// A service built from a source-code repository.
    pub fn with_code_service(mut self, name: &str) -> Self {
        self.services.push((Self::summary(name), None));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.calls()
    }

    fn summary(name: &str) -> AppServiceSummary {
        AppServiceSummary {
            name: name.to_string(),
            arn: format!("arn:aws:apprunner:us-east-1:000000000000:service/{name}"),
        }
    }
}

impl Default for InMemoryAppServices {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppServiceClient for InMemoryAppServices {
    async fn list_services(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<AppServiceSummary>, ClientError> {
        const OP: &str = "apprunner:ListServices";
        self.log.record(OP)?;
        let summaries: Vec<AppServiceSummary> = self
            .services
            .iter()
            .map(|(summary, _)| summary.clone())
            .collect();
        paginate(&summaries, self.page_size, next_token, OP)
    }

    async fn describe_service_image(
        &self,
        service_arn: &str,
    ) -> Result<Option<String>, ClientError> {
        const OP: &str = "apprunner:DescribeService";
        self.log.record(OP)?;
        self.services
            .iter()
            .find(|(summary, _)| summary.arn == service_arn)
            .map(|(_, image)| image.clone())
            .ok_or_else(|| ClientError::new(OP, format!("service not found: {service_arn}")))
    }
}

// ========================================
// SSM
// ========================================

#[derive(Debug)]
pub struct InMemoryParameters {
    parameters: HashMap<String, Vec<String>>,
    page_size: usize,
    log: CallLog,
}

impl InMemoryParameters {
    pub fn new() -> Self {
        Self {
            parameters: HashMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            log: CallLog::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.log.fail_on(operation);
        self
    }

    pub fn with_parameters(mut self, path: &str, values: &[&str]) -> Self {
        self.parameters.insert(
            path.to_string(),
            values.iter().map(|value| value.to_string()).collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.calls()
    }
}

impl Default for InMemoryParameters {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameters {
    async fn get_parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ClientError> {
        const OP: &str = "ssm:GetParametersByPath";
        self.log.record(OP)?;
        let values = self.parameters.get(path).cloned().unwrap_or_default();
        paginate(&values, self.page_size, next_token, OP)
    }
}
