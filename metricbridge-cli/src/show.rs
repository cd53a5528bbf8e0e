use clap::{Args, ValueHint};
use metricbridge_core::{snapshot::MetricOutcome, Snapshot};
use owo_colors::OwoColorize;
use prettytable::{row, Table};

use crate::command::Command;

use anyhow::{Context, Result};

#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Snapshot written by `run --output`
    #[arg(value_hint = ValueHint::FilePath)]
    snapshot: String,

    /// Print the full snapshot as JSON instead of a summary table
    #[arg(long)]
    json: bool,
}

pub(crate) struct ShowCommand;

impl Command for ShowCommand {
    type Args = ShowArgs;
    fn execute(args: &ShowArgs, _quiet: bool) -> Result<()> {
        let snapshot = if args.snapshot.ends_with(".bin") {
            let bytes = std::fs::read(&args.snapshot)
                .with_context(|| format!("Failed to read snapshot {}", args.snapshot))?;
            Snapshot::create_from_binary(&bytes)
        } else {
            let json = std::fs::read_to_string(&args.snapshot)
                .with_context(|| format!("Failed to read snapshot {}", args.snapshot))?;
            Snapshot::from_json(&json)
        }
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot))?;

        if args.json {
            println!("{}", snapshot.to_json()?);
        } else {
            print_snapshot(&snapshot);
        }
        Ok(())
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.6}"))
}

pub(crate) fn print_snapshot(snapshot: &Snapshot) {
    let mut table = Table::new();
    if snapshot.has_reference() {
        table.set_titles(row!["Metric", "Id", "Current", "Reference", "Status"]);
    } else {
        table.set_titles(row!["Metric", "Id", "Current", "Status"]);
    }

    for item in snapshot.metrics() {
        let (current, reference, status) = match &item.outcome {
            MetricOutcome::Success(result) => (
                Some(result.current.value),
                result.reference.as_ref().map(|r| r.value),
                "ok".green().to_string(),
            ),
            MetricOutcome::Failed { error } => (None, None, error.red().to_string()),
        };
        if snapshot.has_reference() {
            table.add_row(row![
                item.display_name,
                item.metric_id,
                format_value(current),
                format_value(reference),
                status
            ]);
        } else {
            table.add_row(row![
                item.display_name,
                item.metric_id,
                format_value(current),
                status
            ]);
        }
    }
    table.printstd();
}
