use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_default::DefaultFromSerde;

use crate::{
    context::{Context, InputColumns},
    dataset::Dataset,
    error::Result,
    impl_default_factory_functions,
    legacy::regression_rows,
    metric_factory::MetricFactory,
    metrics::{Metric, MetricResult, SingleValue},
    render::Widget,
    utils::mean,
};

/// Mean absolute error, computed natively for current and, when given, reference data.
#[derive(Deserialize, Serialize, JsonSchema, DefaultFromSerde, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct Mae {
    #[serde(default = "crate::data_definition::default_task_name")]
    pub regression_name: String,
}

fn mean_absolute_error(dataset: &Dataset, columns: &InputColumns, label: &str) -> Result<f64> {
    let rows = regression_rows(dataset, columns, label)?;
    Ok(
        mean(rows.iter().map(|(_, target, prediction)| (prediction - target).abs()))
            .unwrap_or_default(),
    )
}

fn single_value(value: f64, label: &str) -> SingleValue {
    SingleValue::new(value).with_widgets(vec![Widget::counter("MAE", label, value)])
}

#[typetag::serde(name = "MAE")]
impl Metric for Mae {
    fn typename(&self) -> String {
        "MAE".to_owned()
    }

    fn display_name(&self) -> String {
        "Mean Absolute Error".to_owned()
    }

    fn calculate(&self, context: &Context) -> Result<MetricResult> {
        let input = context.regression_input_data(&self.regression_name)?;
        let current = mean_absolute_error(input.current, &input.columns, "current")?;
        let reference = input
            .reference
            .map(|reference| mean_absolute_error(reference, &input.columns, "reference"))
            .transpose()?;

        Ok(MetricResult {
            current: single_value(current, "current"),
            reference: reference.map(|value| single_value(value, "reference")),
        })
    }
}

#[derive(Default)]
pub struct MaeFactory;

impl MetricFactory for MaeFactory {
    impl_default_factory_functions!("MAE", Mae);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{data_definition::DataDefinition, error::Error};

    fn dataset(predictions: Vec<f64>) -> Dataset {
        Dataset::from_columns(
            vec![
                ("target".to_owned(), vec![1.0, 2.0, 3.0, 4.0].into()),
                ("prediction".to_owned(), predictions.into()),
            ],
            DataDefinition::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_mae_current_and_reference() {
        let current = dataset(vec![1.5, 2.0, 2.0, 4.5]);
        let reference = dataset(vec![1.0, 2.0, 3.0, 4.0]);

        let result = Mae::default()
            .calculate(&Context::new(&current, Some(&reference)))
            .unwrap();
        assert_relative_eq!(result.current.value, 0.5);
        assert_relative_eq!(result.reference.unwrap().value, 0.0);

        let result = Mae::default()
            .calculate(&Context::new(&current, None))
            .unwrap();
        assert!(result.reference.is_none());
    }

    #[test]
    fn test_mae_unknown_task() {
        let current = dataset(vec![1.0, 2.0, 3.0, 4.0]);
        let metric = Mae {
            regression_name: "pricing".to_owned(),
        };
        assert!(matches!(
            metric.calculate(&Context::new(&current, None)),
            Err(Error::TaskNotFound(_))
        ));
    }
}
