use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    metric_registry::METRIC_REGISTRY,
    metrics::Metric,
};

// This intentionally does not derive JsonSchema
// Use gen_json_metric_configs_schema instead with schema_with
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JsonMetricConfig {
    typename: String,
    #[serde(default)]
    config: serde_json::Value,
}

impl JsonMetricConfig {
    pub fn new(typename: String, config: serde_json::Value) -> Self {
        JsonMetricConfig { typename, config }
    }

    pub fn typename(&self) -> String {
        self.typename.to_owned()
    }

    pub fn json_value(&self) -> &serde_json::Value {
        &self.config
    }
}

pub trait MetricFactory: Send + Sync {
    fn parse_config(&self, value: &serde_json::Value) -> Result<Box<dyn Metric>>;
    fn typename(&self) -> String;
    fn get_config_schema(&self) -> RootSchema;
    fn get_config_default(&self) -> serde_json::Value;
}

#[macro_export]
macro_rules! impl_default_factory_functions {
    ($typename: expr, $config_type: ident) => {
        fn typename(&self) -> String {
            $typename.to_owned()
        }

        fn parse_config(
            &self,
            value: &serde_json::Value,
        ) -> $crate::error::Result<Box<dyn $crate::metrics::Metric>> {
            // A missing config block means all defaults
            let value = if value.is_null() {
                serde_json::json!({})
            } else {
                value.clone()
            };
            let res: $config_type = serde_json::from_value(value).map_err(|e| {
                $crate::error::Error::InvalidConfiguration(format!(
                    "Failed to parse {} config: {e}",
                    $typename
                ))
            })?;
            Ok(Box::new(res))
        }

        fn get_config_schema(&self) -> schemars::schema::RootSchema {
            schemars::schema_for!($config_type)
        }

        fn get_config_default(&self) -> serde_json::Value {
            serde_json::to_value($config_type::default()).unwrap_or_default()
        }
    };
}

pub fn parse_config(config: &JsonMetricConfig) -> Result<Box<dyn Metric>> {
    match METRIC_REGISTRY.read().get(&config.typename) {
        Some(factory) => factory.parse_config(config.json_value()),
        None => Err(Error::InvalidArgument(format!(
            "Unknown metric type: {}",
            &config.typename
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_known_and_unknown() {
        let metric = parse_config(&JsonMetricConfig::new("MAE".to_owned(), json!(null))).unwrap();
        assert_eq!(metric.typename(), "MAE");

        let err = parse_config(&JsonMetricConfig::new("Accuracy".to_owned(), json!({})))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown metric type: Accuracy"));
    }

    #[test]
    fn test_bad_config_is_configuration_error() {
        let err = parse_config(&JsonMetricConfig::new(
            "RegressionErrorBiasTable".to_owned(),
            json!({"topError": "high"}),
        ))
        .err()
        .unwrap();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }
}
