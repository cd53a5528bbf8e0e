use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_default::DefaultFromSerde;

use crate::{
    context::Context,
    error::Result,
    impl_default_factory_functions,
    legacy::{LegacyRegressionErrorDistribution, RegressionErrorDistributionResults},
    metric_factory::MetricFactory,
    metrics::{calculate_legacy, LegacyMetricCalculation, Metric, MetricResult},
    render::Widget,
};

/// Histogram of prediction errors. Published value is the mean error of current data.
#[derive(Deserialize, Serialize, JsonSchema, DefaultFromSerde, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct RegressionErrorDistribution {
    #[serde(default = "crate::data_definition::default_task_name")]
    pub regression_name: String,
    #[serde(default)]
    pub bins: Option<usize>,
}

pub struct RegressionErrorDistributionCalculation<'a> {
    metric: &'a RegressionErrorDistribution,
}

impl LegacyMetricCalculation for RegressionErrorDistributionCalculation<'_> {
    type Legacy = LegacyRegressionErrorDistribution;

    fn legacy_metric(&self) -> Result<LegacyRegressionErrorDistribution> {
        LegacyRegressionErrorDistribution::new(self.metric.bins)
    }

    fn task_name(&self) -> &str {
        &self.metric.regression_name
    }

    fn calculate_value(
        &self,
        _context: &Context,
        legacy_result: &RegressionErrorDistributionResults,
        _render: &[Widget],
    ) -> f64 {
        legacy_result.current.mean_error
    }

    fn display_name(&self) -> String {
        "Regression Error Distribution".to_owned()
    }
}

#[typetag::serde]
impl Metric for RegressionErrorDistribution {
    fn typename(&self) -> String {
        "RegressionErrorDistribution".to_owned()
    }

    fn display_name(&self) -> String {
        RegressionErrorDistributionCalculation { metric: self }.display_name()
    }

    fn calculate(&self, context: &Context) -> Result<MetricResult> {
        calculate_legacy(&RegressionErrorDistributionCalculation { metric: self }, context)
    }
}

#[derive(Default)]
pub struct RegressionErrorDistributionFactory;

impl MetricFactory for RegressionErrorDistributionFactory {
    impl_default_factory_functions!("RegressionErrorDistribution", RegressionErrorDistribution);
}
