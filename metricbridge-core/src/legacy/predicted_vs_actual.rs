use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    context::{InputColumns, InputData},
    dataset::Dataset,
    error::Result,
    legacy::{regression_rows, LegacyMetric},
    render::{Widget, WidgetKind, WidgetSize},
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub actual: f64,
    pub predicted: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegressionPredictedVsActualScatterResults {
    pub current: Vec<ScatterPoint>,
    pub reference: Option<Vec<ScatterPoint>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyRegressionPredictedVsActualScatter;

fn scatter(dataset: &Dataset, columns: &InputColumns, label: &str) -> Result<Vec<ScatterPoint>> {
    Ok(regression_rows(dataset, columns, label)?
        .into_iter()
        .map(|(_, actual, predicted)| ScatterPoint { actual, predicted })
        .collect())
}

impl LegacyMetric for LegacyRegressionPredictedVsActualScatter {
    type Result = RegressionPredictedVsActualScatterResults;

    fn calculate(&self, data: &InputData) -> Result<RegressionPredictedVsActualScatterResults> {
        Ok(RegressionPredictedVsActualScatterResults {
            current: scatter(data.current, &data.columns, "current")?,
            reference: data
                .reference
                .map(|reference| scatter(reference, &data.columns, "reference"))
                .transpose()?,
        })
    }

    fn render(&self, result: &RegressionPredictedVsActualScatterResults) -> Vec<Widget> {
        let size = if result.reference.is_some() {
            WidgetSize::Full
        } else {
            WidgetSize::Half
        };
        vec![Widget::new(
            "Predicted vs Actual",
            WidgetKind::Scatter,
            size,
            json!({
                "current": result.current,
                "reference": result.reference,
            }),
        )]
    }
}
