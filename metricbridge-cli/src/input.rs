use std::path::Path;

use anyhow::{Context, Result};
use metricbridge_core::{
    parsers::{DataFormat, TableParser},
    DataDefinition, Dataset, Report,
};

fn is_yaml(path: &str) -> bool {
    matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

pub(crate) fn load_report(path: &str) -> Result<Report> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {path}"))?;
    let report = if is_yaml(path) {
        Report::create_from_yaml(&contents)
    } else {
        Report::create_from_json(&contents)
    };
    report.with_context(|| format!("Failed to load configuration file {path}"))
}

pub(crate) fn load_definition(path: Option<&str>) -> Result<DataDefinition> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read data definition {path}"))?;
            DataDefinition::create_from_json(&contents)
                .with_context(|| format!("Failed to load data definition {path}"))
        }
        None => Ok(DataDefinition::new()),
    }
}

pub(crate) fn load_dataset(path: &str, definition: &DataDefinition) -> Result<Dataset> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read data file {path}"))?;
    tracing::info!(path, "Loading dataset");
    DataFormat::from_path(path)
        .parser()
        .parse_table(&contents, definition.clone())
        .with_context(|| format!("Failed to parse data file {path}"))
}
