use clap::{Args, Subcommand};
use metricbridge_core::{metric_registry::METRIC_REGISTRY, run_config::RunConfig};
use serde_json::json;

use crate::{command::Command, input};

use anyhow::{Context, Result};

#[derive(Args)]
pub(crate) struct ConfigCheckArgs {
    config: String,
}

#[derive(Args)]
pub(crate) struct ConfigNewArgs {
    /// Metric type names to include
    #[arg(required = true)]
    metrics: Vec<String>,

    /// Schema location to reference from `$schema` (e.g. the output of `gen-schema`)
    #[arg(long)]
    schema: Option<String>,
}

#[derive(Subcommand)]
enum ConfigSubCommand {
    /// Check a report configuration for validity, including metric type checking.
    Check(ConfigCheckArgs),
    /// Emit a full report configuration with all defaults.
    New(ConfigNewArgs),
}

#[derive(Args)]
pub(crate) struct ConfigArgs {
    #[command(subcommand)]
    subcommand: ConfigSubCommand,
}

pub(crate) struct ConfigCommand;

impl Command for ConfigCommand {
    type Args = ConfigArgs;
    fn execute(args: &ConfigArgs, quiet: bool) -> Result<()> {
        match &args.subcommand {
            ConfigSubCommand::Check(args) => {
                let report = input::load_report(&args.config)?;
                if !quiet {
                    println!("ok ({} metrics)", report.metrics().len());
                }
                Ok(())
            }
            ConfigSubCommand::New(args) => {
                let registry = METRIC_REGISTRY.read();
                let metrics = args
                    .metrics
                    .iter()
                    .map(|typename| {
                        let factory = registry.get(typename).with_context(|| {
                            format!(
                                "Metric \"{}\" does not exist. Available metrics are: {}",
                                typename,
                                registry.typenames().join(", ")
                            )
                        })?;
                        Ok(json!({
                            "typename": typename,
                            "config": factory.get_config_default()
                        }))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut overall_config = json!({
                    "runConfig": RunConfig::default(),
                    "metrics": metrics
                });
                if let Some(schema) = &args.schema {
                    overall_config["$schema"] = json!(schema);
                }
                println!("{}", serde_json::to_string_pretty(&overall_config)?);
                Ok(())
            }
        }
    }
}
