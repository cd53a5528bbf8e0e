use crate::{
    context::{Context, InputData},
    error::Result,
    legacy::LegacyMetric,
    metrics::{MetricResult, SingleValue},
    render::Widget,
};

/// Exposes a legacy calculation under the report API.
///
/// Every migrated metric gets one hand-written implementation: it builds the legacy request
/// from the declaration, names the regression task to resolve inputs for, and reduces the rich
/// legacy result to the published scalar.
pub trait LegacyMetricCalculation {
    type Legacy: LegacyMetric;

    fn legacy_metric(&self) -> Result<Self::Legacy>;

    fn task_name(&self) -> &str;

    fn calculate_value(
        &self,
        context: &Context,
        legacy_result: &<Self::Legacy as LegacyMetric>::Result,
        render: &[Widget],
    ) -> f64;

    fn display_name(&self) -> String;

    fn gen_input_data<'a>(&self, context: &Context<'a>) -> Result<InputData<'a>> {
        context.regression_input_data(self.task_name())
    }

    /// Widgets produced by the legacy renderer, as published with the result.
    fn forward_render_artifacts(&self, render: Vec<Widget>) -> Vec<Widget> {
        render
    }

    fn additional_widgets(&self, _context: &Context) -> Vec<Widget> {
        vec![]
    }
}

pub fn calculate_legacy<C: LegacyMetricCalculation>(
    calculation: &C,
    context: &Context,
) -> Result<MetricResult> {
    let legacy = calculation.legacy_metric()?;
    let input = calculation.gen_input_data(context)?;
    tracing::debug!(
        metric = %calculation.display_name(),
        task = calculation.task_name(),
        "Running legacy calculation"
    );

    let legacy_result = legacy.calculate(&input)?;
    let render = legacy.render(&legacy_result);
    let value = calculation.calculate_value(context, &legacy_result, &render);

    let mut widgets = calculation.forward_render_artifacts(render);
    widgets.extend(calculation.additional_widgets(context));

    Ok(MetricResult::current_only(
        SingleValue::new(value).with_widgets(widgets),
    ))
}
