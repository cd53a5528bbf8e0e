use clap::{Args, ValueHint};
use metricbridge_core::run_config::RunConfig;
use owo_colors::OwoColorize;

use crate::{command::Command, input, show::print_snapshot};

use anyhow::{Context, Result};

#[derive(Args)]
pub(crate) struct RunArgs {
    /// Report configuration (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: String,

    /// Current data (CSV, or JSON records with a .json extension)
    #[arg(long, value_hint = ValueHint::FilePath)]
    current: String,

    /// Reference data, same format rules as --current
    #[arg(long, value_hint = ValueHint::FilePath)]
    reference: Option<String>,

    /// Data definition JSON declaring column types and regression tasks
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    definition: Option<String>,

    /// Write the snapshot to this file. A .bin extension writes the binary form.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<String>,

    /// Abort on the first failing metric
    #[arg(long)]
    fail_fast: bool,

    /// Drop rendering widgets from the snapshot
    #[arg(long)]
    no_widgets: bool,
}

pub(crate) struct RunCommand;

impl Command for RunCommand {
    type Args = RunArgs;
    fn execute(args: &RunArgs, quiet: bool) -> Result<()> {
        let mut report = input::load_report(&args.config)?;
        if args.fail_fast || args.no_widgets {
            let run_config = RunConfig::new(
                report.run_config().include_widgets() && !args.no_widgets,
                report.run_config().fail_fast() || args.fail_fast,
            );
            report = report.with_run_config(run_config);
        }

        let definition = input::load_definition(args.definition.as_deref())?;
        let current = input::load_dataset(&args.current, &definition)?;
        let reference = args
            .reference
            .as_deref()
            .map(|path| input::load_dataset(path, &definition))
            .transpose()?;

        let snapshot = report
            .run(&current, reference.as_ref())
            .context("Failed to run report")?;

        if let Some(output) = &args.output {
            let bytes = if output.ends_with(".bin") {
                snapshot.serialize_binary()?
            } else {
                snapshot.to_json()?.into_bytes()
            };
            std::fs::write(output, bytes)
                .with_context(|| format!("Failed to write snapshot to {output}"))?;
        }

        if !quiet {
            print_snapshot(&snapshot);
            let failures = snapshot.failures().count();
            if failures > 0 {
                eprintln!(
                    "{}: {failures} of {} metrics failed",
                    "warning".yellow().bold(),
                    snapshot.len()
                );
            }
        }
        Ok(())
    }
}
