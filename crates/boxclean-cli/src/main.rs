//! boxclean - removes ECR images no running workload references.
//!
//! Builds the set of images used by ECS, Lambda and App Runner, then walks
//! every opted-in repository. Dry-run unless `DRY_RUN=false`.
//!
//! Runs once from a shell. Inside Lambda (`AWS_LAMBDA_FUNCTION_NAME` set) it
//! serves invocations instead, one full clean per event.

mod logging;
mod mode;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;

use boxclean_aws::AwsClients;
use boxclean_core::impls::TracingEventSink;
use boxclean_core::ports::{EventSink, SystemClock};
use boxclean_core::usage::{AppRunnerUsageSource, EcsUsageSource, LambdaUsageSource};
use boxclean_core::{Cleaner, CleanerConfig, UsageSetBuilder};

use logging::{LogFormat, init_logging};
use mode::RunMode;

#[derive(Debug, Parser)]
#[command(name = "boxclean")]
#[command(about = "Removes old ECR images that no ECS service, Lambda function or App Runner service uses")]
#[command(version)]
struct Args {
    /// Log output format.
    #[arg(long, value_enum, env = "BOX_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// AWS region; defaults to the SDK region chain.
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.log_format);

    let mode = RunMode::from_env();
    let config = CleanerConfig::from_env();
    tracing::info!(
        ?mode,
        dry_run = config.dry_run,
        default_keep_days = config.default_keep_days,
        "starting ECR cleaner"
    );

    let clients = AwsClients::load(args.region)
        .await
        .wrap_err("cannot load AWS config")?;

    let events: Arc<dyn EventSink> = Arc::new(TracingEventSink);
    let usage = UsageSetBuilder::new(events.clone())
        .with_source(EcsUsageSource::new(Arc::new(clients.ecs)))
        .with_source(LambdaUsageSource::new(Arc::new(clients.lambda)))
        .with_source(AppRunnerUsageSource::new(
            Arc::new(clients.app_runner),
            Arc::new(clients.ssm),
            clients.region,
        ));

    let cleaner = Arc::new(Cleaner::new(Arc::new(clients.ecr), usage, config, events));

    match mode {
        RunMode::Once => {
            let report = cleaner
                .run(&SystemClock)
                .await
                .wrap_err("ECR cleaning failed")?;
            println!("{}", serde_json::to_string(&report)?);
        }
        RunMode::Lambda => {
            let handler = service_fn(move |_event: LambdaEvent<Value>| {
                let cleaner = cleaner.clone();
                async move {
                    cleaner
                        .run(&SystemClock)
                        .await
                        .map_err(lambda_runtime::Error::from)
                }
            });
            lambda_runtime::run(handler)
                .await
                .map_err(|err| eyre!("lambda runtime failed: {err}"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn log_format_parses_from_flag() {
        let args = Args::try_parse_from(["boxclean", "--log-format", "json", "--region", "eu-west-1"])
            .unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.region.as_deref(), Some("eu-west-1"));
    }
}
