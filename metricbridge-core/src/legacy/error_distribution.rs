use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    context::{InputColumns, InputData},
    dataset::Dataset,
    error::{Error, Result},
    legacy::{regression_rows, LegacyMetric},
    render::{Widget, WidgetKind, WidgetSize},
    utils::mean,
};

pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Equal width bins over `[min, max]`; the last bin is closed on the right.
    pub fn from_values(values: &[f64], bins: usize) -> Histogram {
        let bins = bins.max(1);
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });

        if values.is_empty() {
            return Histogram {
                edges: vec![],
                counts: vec![],
            };
        }
        if max <= min {
            return Histogram {
                edges: vec![min - 0.5, min + 0.5],
                counts: vec![values.len()],
            };
        }

        let width = (max - min) / bins as f64;
        let edges = (0..=bins).map(|i| min + width * i as f64).collect();
        let mut counts = vec![0; bins];
        for v in values {
            let index = (((v - min) / width) as usize).min(bins - 1);
            counts[index] += 1;
        }
        Histogram { edges, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorSummary {
    pub mean_error: f64,
    pub histogram: Histogram,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegressionErrorDistributionResults {
    pub current: ErrorSummary,
    pub reference: Option<ErrorSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRegressionErrorDistribution {
    bins: usize,
}

impl LegacyRegressionErrorDistribution {
    pub fn new(bins: Option<usize>) -> Result<LegacyRegressionErrorDistribution> {
        let bins = bins.unwrap_or(DEFAULT_HISTOGRAM_BINS);
        if bins == 0 {
            return Err(Error::InvalidParameter(
                "bins should be greater than 0".to_owned(),
            ));
        }
        Ok(LegacyRegressionErrorDistribution { bins })
    }

    fn summarize(
        &self,
        dataset: &Dataset,
        columns: &InputColumns,
        label: &str,
    ) -> Result<ErrorSummary> {
        let errors: Vec<f64> = regression_rows(dataset, columns, label)?
            .into_iter()
            .map(|(_, target, prediction)| prediction - target)
            .collect();
        Ok(ErrorSummary {
            mean_error: mean(errors.iter().copied()).unwrap_or_default(),
            histogram: Histogram::from_values(&errors, self.bins),
        })
    }
}

impl LegacyMetric for LegacyRegressionErrorDistribution {
    type Result = RegressionErrorDistributionResults;

    fn calculate(&self, data: &InputData) -> Result<RegressionErrorDistributionResults> {
        Ok(RegressionErrorDistributionResults {
            current: self.summarize(data.current, &data.columns, "current")?,
            reference: data
                .reference
                .map(|reference| self.summarize(reference, &data.columns, "reference"))
                .transpose()?,
        })
    }

    fn render(&self, result: &RegressionErrorDistributionResults) -> Vec<Widget> {
        vec![Widget::new(
            "Error Distribution",
            WidgetKind::Histogram,
            WidgetSize::Full,
            json!({
                "current": result.current.histogram,
                "reference": result.reference.as_ref().map(|r| &r.histogram),
            }),
        )]
    }
}
