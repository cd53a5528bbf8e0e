use clap::Args;
use metricbridge_core::config_schema::ConfigSchema;

use crate::command::Command;

use anyhow::Result;

#[derive(Args)]
pub(crate) struct GenSchemaArgs {}

pub(crate) struct GenSchemaCommand;

impl Command for GenSchemaCommand {
    type Args = GenSchemaArgs;
    fn execute(_args: &GenSchemaArgs, _quiet: bool) -> Result<()> {
        let schema = ConfigSchema::with_registered_metrics();
        println!("{}", serde_json::to_string_pretty(schema.schema())?);
        Ok(())
    }
}
