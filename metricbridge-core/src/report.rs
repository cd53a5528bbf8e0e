use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    context::Context,
    dataset::Dataset,
    error::{Error, Result},
    metric_factory::JsonMetricConfig,
    metrics::{metric_config, metric_id, Metric},
    run_config::RunConfig,
    snapshot::{MetricOutcome, Snapshot, SnapshotItem},
};

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    // $schema,
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,
    #[serde(default)]
    run_config: RunConfig,
    #[schemars(schema_with = "crate::config_schema::gen_json_metric_configs_schema")]
    metrics: Vec<JsonMetricConfig>,
}

/// An ordered set of metric declarations, run together against the same data.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    run_config: RunConfig,
    metrics: Vec<Box<dyn Metric>>,
}

impl Report {
    pub fn new(metrics: Vec<Box<dyn Metric>>) -> Report {
        Report {
            run_config: RunConfig::default(),
            metrics,
        }
    }

    pub fn with_run_config(mut self, run_config: RunConfig) -> Report {
        self.run_config = run_config;
        self
    }

    pub fn create_from_json(json: &str) -> Result<Report> {
        let config: Configuration = serde_json::from_str(json).map_err(|e| {
            Error::InvalidConfiguration(format!("Failed to parse configuration: {e}"))
        })?;

        Self::create_from_configuration(config)
    }

    pub fn create_from_yaml(yaml: &str) -> Result<Report> {
        let json_from_yaml = serde_yaml::from_str::<serde_json::Value>(yaml)
            .map_err(|e| Error::InvalidConfiguration(format!("Failed to parse yaml: {e}")))?;
        let config: Configuration = serde_json::from_value(json_from_yaml).map_err(|e| {
            Error::InvalidConfiguration(format!("Failed to parse configuration: {e}"))
        })?;

        Self::create_from_configuration(config)
    }

    fn create_from_configuration(config: Configuration) -> Result<Report> {
        let metrics = config
            .metrics
            .iter()
            .map(crate::metric_factory::parse_config)
            .collect::<Result<Vec<_>>>()?;

        Ok(Report {
            run_config: config.run_config,
            metrics,
        })
    }

    /// The report as a configuration document that `create_from_json` accepts.
    pub fn to_configuration_json(&self) -> Result<serde_json::Value> {
        let metrics: Vec<JsonMetricConfig> = self
            .metrics
            .iter()
            .map(|m| JsonMetricConfig::new(m.typename(), metric_config(m.as_ref())))
            .collect();
        Ok(serde_json::json!({
            "runConfig": serde_json::to_value(&self.run_config)?,
            "metrics": serde_json::to_value(metrics)?,
        }))
    }

    pub fn metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }

    pub fn run_config(&self) -> &RunConfig {
        &self.run_config
    }

    /// Runs every metric against `current` (and `reference`, when given).
    ///
    /// A failing metric is recorded in the snapshot and does not stop its siblings, unless
    /// `fail_fast` is set. Declarations with identical parameters are computed once.
    pub fn run(&self, current: &Dataset, reference: Option<&Dataset>) -> Result<Snapshot> {
        let context = Context::new(current, reference);
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(self.metrics.len());

        tracing::info!(
            metrics = self.metrics.len(),
            current_rows = current.num_rows(),
            reference_rows = reference.map(|r| r.num_rows()),
            "Running report"
        );

        for metric in &self.metrics {
            let id = metric_id(metric.as_ref());
            if !seen.insert(id.clone()) {
                tracing::debug!(metric = %id, "Skipping duplicate metric");
                continue;
            }

            let span = tracing::info_span!("metric", metric = %id);
            let _enter = span.enter();

            let outcome = match metric.calculate(&context) {
                Ok(mut result) => {
                    if !self.run_config.include_widgets() {
                        result.current.widgets.clear();
                        if let Some(reference) = result.reference.as_mut() {
                            reference.widgets.clear();
                        }
                    }
                    tracing::debug!(value = result.current.value, "Metric calculated");
                    MetricOutcome::Success(result)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Metric failed");
                    if self.run_config.fail_fast() {
                        return Err(Error::MetricFailed {
                            metric: id.to_string(),
                            reason: e.to_string(),
                        });
                    }
                    MetricOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };

            items.push(SnapshotItem {
                metric_id: id,
                typename: metric.typename(),
                display_name: metric.display_name(),
                config: metric_config(metric.as_ref()),
                outcome,
            });
        }

        Ok(Snapshot::new(reference.is_some(), items))
    }
}
