use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_default::DefaultFromSerde;

use crate::{
    context::Context,
    error::Result,
    impl_default_factory_functions,
    legacy::{LegacyRegressionErrorBiasTable, RegressionErrorBiasTableResults},
    metric_factory::MetricFactory,
    metrics::{calculate_legacy, LegacyMetricCalculation, Metric, MetricResult},
    render::Widget,
};

/// Error bias analysis: how feature values differ between rows the model under- and
/// overestimates.
///
/// `columns` restricts the analyzed features (all features when absent). `top_error` is the
/// error quantile defining the tails, between 0 and 0.5 (0.05 when absent).
#[derive(Deserialize, Serialize, JsonSchema, DefaultFromSerde, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct RegressionErrorBiasTable {
    #[serde(default = "crate::data_definition::default_task_name")]
    pub regression_name: String,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub top_error: Option<f64>,
}

impl RegressionErrorBiasTable {
    pub fn new() -> RegressionErrorBiasTable {
        RegressionErrorBiasTable::default()
    }

    pub fn with_columns(mut self, columns: &[&str]) -> RegressionErrorBiasTable {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_top_error(mut self, top_error: f64) -> RegressionErrorBiasTable {
        self.top_error = Some(top_error);
        self
    }

    pub fn with_regression_name(mut self, name: &str) -> RegressionErrorBiasTable {
        self.regression_name = name.to_owned();
        self
    }
}

/// Maps the declaration onto the legacy constructor. Parameter checks are left to it.
pub fn build_legacy_request(
    declaration: &RegressionErrorBiasTable,
) -> Result<LegacyRegressionErrorBiasTable> {
    LegacyRegressionErrorBiasTable::new(declaration.columns.clone(), declaration.top_error)
}

/// Number of features that received a bias entry; 0 when there are none.
pub fn reduce(legacy_result: &RegressionErrorBiasTableResults) -> f64 {
    match &legacy_result.error_bias {
        Some(error_bias) if !error_bias.is_empty() => error_bias.len() as f64,
        _ => 0.0,
    }
}

pub fn forward_render_artifacts(render: Vec<Widget>) -> Vec<Widget> {
    render
}

pub struct RegressionErrorBiasTableCalculation<'a> {
    metric: &'a RegressionErrorBiasTable,
}

impl<'a> RegressionErrorBiasTableCalculation<'a> {
    pub fn new(metric: &'a RegressionErrorBiasTable) -> Self {
        RegressionErrorBiasTableCalculation { metric }
    }
}

impl LegacyMetricCalculation for RegressionErrorBiasTableCalculation<'_> {
    type Legacy = LegacyRegressionErrorBiasTable;

    fn legacy_metric(&self) -> Result<LegacyRegressionErrorBiasTable> {
        build_legacy_request(self.metric)
    }

    fn task_name(&self) -> &str {
        &self.metric.regression_name
    }

    fn calculate_value(
        &self,
        _context: &Context,
        legacy_result: &RegressionErrorBiasTableResults,
        _render: &[Widget],
    ) -> f64 {
        reduce(legacy_result)
    }

    fn display_name(&self) -> String {
        "Regression Error Bias Table".to_owned()
    }

    fn forward_render_artifacts(&self, render: Vec<Widget>) -> Vec<Widget> {
        forward_render_artifacts(render)
    }
}

#[typetag::serde]
impl Metric for RegressionErrorBiasTable {
    fn typename(&self) -> String {
        "RegressionErrorBiasTable".to_owned()
    }

    fn display_name(&self) -> String {
        RegressionErrorBiasTableCalculation::new(self).display_name()
    }

    fn calculate(&self, context: &Context) -> Result<MetricResult> {
        calculate_legacy(&RegressionErrorBiasTableCalculation::new(self), context)
    }
}

#[derive(Default)]
pub struct RegressionErrorBiasTableFactory;

impl MetricFactory for RegressionErrorBiasTableFactory {
    impl_default_factory_functions!("RegressionErrorBiasTable", RegressionErrorBiasTable);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        data_definition::DataDefinition,
        dataset::Dataset,
        error::Error,
        legacy::{FeatureBias, GroupValues},
        render::WidgetKind,
    };

    fn results(features: &[&str]) -> RegressionErrorBiasTableResults {
        let bias = FeatureBias::Numerical {
            current: GroupValues {
                majority: Some(1.0),
                under: Some(0.0),
                over: Some(2.0),
                range: 100.0,
            },
            reference: None,
        };
        RegressionErrorBiasTableResults {
            top_error: 0.05,
            columns: features.iter().map(|f| f.to_string()).collect(),
            error_bias: Some(
                features
                    .iter()
                    .map(|f| (f.to_string(), bias.clone()))
                    .collect(),
            ),
            current_plot_data: vec![],
            reference_plot_data: None,
        }
    }

    #[test]
    fn test_reduce_empty_and_absent_mapping() {
        let mut result = results(&[]);
        assert_eq!(reduce(&result), 0.0);
        result.error_bias = None;
        assert_eq!(reduce(&result), 0.0);
    }

    #[test]
    fn test_reduce_counts_entries_regardless_of_order() {
        assert_eq!(reduce(&results(&["age"])), 1.0);
        assert_eq!(reduce(&results(&["income", "age", "city"])), 3.0);
        assert_eq!(
            reduce(&results(&["city", "age", "income"])),
            reduce(&results(&["age", "income", "city"]))
        );
    }

    #[test]
    fn test_build_legacy_request_maps_fields() {
        let declaration = RegressionErrorBiasTable::new()
            .with_columns(&["age", "income"])
            .with_top_error(0.1);
        let legacy = build_legacy_request(&declaration).unwrap();
        assert_eq!(
            legacy.columns(),
            Some(&["age".to_owned(), "income".to_owned()][..])
        );
        assert_relative_eq!(legacy.top_error(), 0.1);

        let invalid = RegressionErrorBiasTable::new().with_top_error(0.7);
        assert!(matches!(
            build_legacy_request(&invalid),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_forward_render_artifacts_is_identity() {
        let widgets = vec![Widget::counter("a", "current", 1.0)];
        assert_eq!(forward_render_artifacts(widgets.clone()), widgets);
        assert!(forward_render_artifacts(vec![]).is_empty());
    }

    #[test]
    fn test_default_declaration() {
        let declaration = RegressionErrorBiasTable::default();
        assert_eq!(declaration.regression_name, "default");
        assert_eq!(declaration.columns, None);
        assert_eq!(declaration.top_error, None);
    }

    #[test]
    fn test_calculate_through_context() {
        let current = Dataset::from_columns(
            vec![
                ("target".to_owned(), vec![1.0, 2.0, 3.0, 4.0].into()),
                ("prediction".to_owned(), vec![1.5, 2.0, 2.5, 4.5].into()),
                ("age".to_owned(), vec![20.0, 30.0, 40.0, 50.0].into()),
                ("income".to_owned(), vec![1.0, 2.0, 3.0, 4.0].into()),
            ],
            DataDefinition::new(),
        )
        .unwrap();
        let context = Context::new(&current, None);

        let all = RegressionErrorBiasTable::new().calculate(&context).unwrap();
        assert_eq!(all.current.value, 2.0);
        assert!(all.reference.is_none());
        assert_eq!(all.current.widgets.len(), 1);
        assert_eq!(all.current.widgets[0].kind, WidgetKind::Table);

        let one = RegressionErrorBiasTable::new()
            .with_columns(&["age"])
            .calculate(&context)
            .unwrap();
        assert_eq!(one.current.value, 1.0);

        let missing_task = RegressionErrorBiasTable::new()
            .with_regression_name("pricing")
            .calculate(&context);
        assert!(matches!(missing_task, Err(Error::TaskNotFound(_))));

        // Parameters are checked before the task is resolved.
        let both_invalid = RegressionErrorBiasTable::new()
            .with_regression_name("pricing")
            .with_top_error(0.9)
            .calculate(&context);
        assert!(matches!(both_invalid, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_factory_parses_camel_case_config() {
        let factory = RegressionErrorBiasTableFactory;
        let metric = factory
            .parse_config(&serde_json::json!({"columns": ["age"], "topError": 0.1}))
            .unwrap();
        assert_eq!(metric.typename(), "RegressionErrorBiasTable");
        assert!(factory
            .parse_config(&serde_json::json!({"top_err": 0.1}))
            .is_err());
        assert_eq!(
            factory.get_config_default(),
            serde_json::json!({"regressionName": "default", "columns": null, "topError": null})
        );
    }
}
