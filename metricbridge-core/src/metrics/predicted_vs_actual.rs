use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_default::DefaultFromSerde;

use crate::{
    context::Context,
    error::Result,
    impl_default_factory_functions,
    legacy::{LegacyRegressionPredictedVsActualScatter, RegressionPredictedVsActualScatterResults},
    metric_factory::MetricFactory,
    metrics::{calculate_legacy, LegacyMetricCalculation, Metric, MetricResult},
    render::Widget,
};

/// Scatter of predicted against actual values. Published value is the number of plotted points.
#[derive(Deserialize, Serialize, JsonSchema, DefaultFromSerde, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct RegressionPredictedVsActualScatter {
    #[serde(default = "crate::data_definition::default_task_name")]
    pub regression_name: String,
}

pub struct RegressionPredictedVsActualScatterCalculation<'a> {
    metric: &'a RegressionPredictedVsActualScatter,
}

impl LegacyMetricCalculation for RegressionPredictedVsActualScatterCalculation<'_> {
    type Legacy = LegacyRegressionPredictedVsActualScatter;

    fn legacy_metric(&self) -> Result<LegacyRegressionPredictedVsActualScatter> {
        Ok(LegacyRegressionPredictedVsActualScatter)
    }

    fn task_name(&self) -> &str {
        &self.metric.regression_name
    }

    fn calculate_value(
        &self,
        _context: &Context,
        legacy_result: &RegressionPredictedVsActualScatterResults,
        _render: &[Widget],
    ) -> f64 {
        legacy_result.current.len() as f64
    }

    fn display_name(&self) -> String {
        "Regression Predicted vs Actual Scatter".to_owned()
    }
}

#[typetag::serde]
impl Metric for RegressionPredictedVsActualScatter {
    fn typename(&self) -> String {
        "RegressionPredictedVsActualScatter".to_owned()
    }

    fn display_name(&self) -> String {
        RegressionPredictedVsActualScatterCalculation { metric: self }.display_name()
    }

    fn calculate(&self, context: &Context) -> Result<MetricResult> {
        calculate_legacy(
            &RegressionPredictedVsActualScatterCalculation { metric: self },
            context,
        )
    }
}

#[derive(Default)]
pub struct RegressionPredictedVsActualScatterFactory;

impl MetricFactory for RegressionPredictedVsActualScatterFactory {
    impl_default_factory_functions!(
        "RegressionPredictedVsActualScatter",
        RegressionPredictedVsActualScatter
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data_definition::DataDefinition, dataset::Dataset};

    #[test]
    fn test_point_count_published() {
        let current = Dataset::from_columns(
            vec![
                ("target".to_owned(), vec![1.0, 2.0, 3.0].into()),
                ("prediction".to_owned(), vec![1.0, 2.5, 3.5].into()),
            ],
            DataDefinition::new(),
        )
        .unwrap();
        let context = Context::new(&current, None);

        let result = RegressionPredictedVsActualScatter::default()
            .calculate(&context)
            .unwrap();
        assert_eq!(result.current.value, 3.0);
        assert_eq!(result.current.widgets.len(), 1);
    }
}
