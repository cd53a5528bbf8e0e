use std::collections::BTreeMap;

use derive_more::Display;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    context::{InputColumns, InputData},
    dataset::{Column, ColumnType, Dataset},
    error::{Error, Result},
    legacy::{regression_rows, LegacyMetric},
    render::Widget,
    utils::{mean, mode, quantile},
};

pub const DEFAULT_TOP_ERROR: f64 = 0.05;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorGroup {
    Majority,
    Underestimation,
    Overestimation,
}

/// Per error group statistic of one feature, plus how far apart the under and over groups are.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroupValues<T> {
    pub majority: Option<T>,
    pub under: Option<T>,
    pub over: Option<T>,
    pub range: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "featureType")]
pub enum FeatureBias {
    Numerical {
        current: GroupValues<f64>,
        reference: Option<GroupValues<f64>>,
    },
    Categorical {
        current: GroupValues<String>,
        reference: Option<GroupValues<String>>,
    },
}

impl FeatureBias {
    pub fn feature_type(&self) -> ColumnType {
        match self {
            FeatureBias::Numerical { .. } => ColumnType::Numerical,
            FeatureBias::Categorical { .. } => ColumnType::Categorical,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ErrorBiasRow {
    pub row: usize,
    pub error: f64,
    pub group: ErrorGroup,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegressionErrorBiasTableResults {
    pub top_error: f64,
    pub columns: Vec<String>,
    pub error_bias: Option<BTreeMap<String, FeatureBias>>,
    pub current_plot_data: Vec<ErrorBiasRow>,
    pub reference_plot_data: Option<Vec<ErrorBiasRow>>,
}

/// Splits rows into under/over estimation tails by error quantiles and compares feature values
/// across the groups.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRegressionErrorBiasTable {
    columns: Option<Vec<String>>,
    top_error: f64,
}

impl LegacyRegressionErrorBiasTable {
    pub fn new(
        columns: Option<Vec<String>>,
        top_error: Option<f64>,
    ) -> Result<LegacyRegressionErrorBiasTable> {
        let top_error = top_error.unwrap_or(DEFAULT_TOP_ERROR);
        if !(0.0..=0.5).contains(&top_error) {
            return Err(Error::InvalidParameter(format!(
                "top_error should be in range [0, 0.5], got {top_error}"
            )));
        }
        Ok(LegacyRegressionErrorBiasTable { columns, top_error })
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn top_error(&self) -> f64 {
        self.top_error
    }

    fn selected_features(&self, data: &InputData) -> Result<Vec<(String, ColumnType)>> {
        let features: Vec<(String, ColumnType)> = match &self.columns {
            Some(columns) => columns
                .iter()
                .unique()
                .map(|name| match data.current.column(name) {
                    Some(column) => Ok((name.clone(), column.column_type())),
                    None => Err(Error::InvalidConfiguration(format!(
                        "Column \"{name}\" not found in current data"
                    ))),
                })
                .collect::<Result<_>>()?,
            None => data
                .columns
                .numerical_features
                .iter()
                .map(|name| (name.clone(), ColumnType::Numerical))
                .chain(
                    data.columns
                        .categorical_features
                        .iter()
                        .map(|name| (name.clone(), ColumnType::Categorical)),
                )
                .collect(),
        };

        if let Some(reference) = data.reference {
            for (name, column_type) in &features {
                match reference.column(name) {
                    Some(column) if column.column_type() == *column_type => {}
                    Some(_) => {
                        return Err(Error::InvalidConfiguration(format!(
                            "Column \"{name}\" has a different type in reference data"
                        )))
                    }
                    None => {
                        return Err(Error::InvalidConfiguration(format!(
                            "Column \"{name}\" not found in reference data"
                        )))
                    }
                }
            }
        }

        Ok(features)
    }

    fn group_rows(
        &self,
        dataset: &Dataset,
        columns: &InputColumns,
        label: &str,
    ) -> Result<Vec<ErrorBiasRow>> {
        let rows = regression_rows(dataset, columns, label)?;
        let sorted: Vec<f64> = rows
            .iter()
            .map(|(_, target, prediction)| prediction - target)
            .sorted_by(|a, b| a.total_cmp(b))
            .collect();

        // Both quantiles exist since `regression_rows` never returns an empty set.
        let low = quantile(&sorted, self.top_error).unwrap_or(f64::NEG_INFINITY);
        let high = quantile(&sorted, 1.0 - self.top_error).unwrap_or(f64::INFINITY);

        Ok(rows
            .into_iter()
            .map(|(row, target, prediction)| {
                let error = prediction - target;
                let group = if error <= low {
                    ErrorGroup::Underestimation
                } else if error >= high {
                    ErrorGroup::Overestimation
                } else {
                    ErrorGroup::Majority
                };
                ErrorBiasRow { row, error, group }
            })
            .collect())
    }
}

fn numerical_bias(values: &[Option<f64>], rows: &[ErrorBiasRow]) -> GroupValues<f64> {
    let group_mean = |group: ErrorGroup| {
        mean(
            rows.iter()
                .filter(|r| r.group == group)
                .filter_map(|r| values[r.row])
                .filter(|v| v.is_finite()),
        )
    };

    let majority = group_mean(ErrorGroup::Majority);
    let under = group_mean(ErrorGroup::Underestimation);
    let over = group_mean(ErrorGroup::Overestimation);

    let range = match (under, over) {
        (Some(under), Some(over)) if under != over => {
            let observed = rows
                .iter()
                .filter_map(|r| values[r.row])
                .filter(|v| v.is_finite());
            match observed.minmax().into_option() {
                Some((min, max)) if max > min => 100.0 * (over - under).abs() / (max - min),
                _ => 0.0,
            }
        }
        _ => 0.0,
    };

    GroupValues {
        majority,
        under,
        over,
        range,
    }
}

fn categorical_bias(values: &[Option<String>], rows: &[ErrorBiasRow]) -> GroupValues<String> {
    let group_mode = |group: ErrorGroup| {
        mode(
            rows.iter()
                .filter(|r| r.group == group)
                .filter_map(|r| values[r.row].as_deref()),
        )
    };

    let majority = group_mode(ErrorGroup::Majority);
    let under = group_mode(ErrorGroup::Underestimation);
    let over = group_mode(ErrorGroup::Overestimation);
    let range = if under != over { 1.0 } else { 0.0 };

    GroupValues {
        majority,
        under,
        over,
        range,
    }
}

fn feature_bias(
    name: &str,
    current: (&Dataset, &[ErrorBiasRow]),
    reference: Option<(&Dataset, &[ErrorBiasRow])>,
) -> Option<FeatureBias> {
    match current.0.column(name)? {
        Column::Numerical(values) => Some(FeatureBias::Numerical {
            current: numerical_bias(values, current.1),
            reference: reference.and_then(|(dataset, rows)| {
                dataset
                    .column(name)?
                    .as_numerical()
                    .map(|values| numerical_bias(values, rows))
            }),
        }),
        Column::Categorical(values) => Some(FeatureBias::Categorical {
            current: categorical_bias(values, current.1),
            reference: reference.and_then(|(dataset, rows)| {
                dataset
                    .column(name)?
                    .as_categorical()
                    .map(|values| categorical_bias(values, rows))
            }),
        }),
    }
}

impl LegacyMetric for LegacyRegressionErrorBiasTable {
    type Result = RegressionErrorBiasTableResults;

    fn calculate(&self, data: &InputData) -> Result<RegressionErrorBiasTableResults> {
        let features = self.selected_features(data)?;
        let current_rows = self.group_rows(data.current, &data.columns, "current")?;
        let reference_rows = data
            .reference
            .map(|reference| self.group_rows(reference, &data.columns, "reference"))
            .transpose()?;

        tracing::debug!(
            features = features.len(),
            rows = current_rows.len(),
            top_error = self.top_error,
            "Computing error bias table"
        );

        let error_bias: BTreeMap<String, FeatureBias> = features
            .iter()
            .filter_map(|(name, _)| {
                let reference = data.reference.zip(reference_rows.as_deref());
                feature_bias(name, (data.current, current_rows.as_slice()), reference)
                    .map(|bias| (name.clone(), bias))
            })
            .collect();

        Ok(RegressionErrorBiasTableResults {
            top_error: self.top_error,
            columns: features.into_iter().map(|(name, _)| name).collect(),
            error_bias: Some(error_bias),
            current_plot_data: current_rows,
            reference_plot_data: reference_rows,
        })
    }

    fn render(&self, result: &RegressionErrorBiasTableResults) -> Vec<Widget> {
        let with_reference = result.reference_plot_data.is_some();
        let mut header = vec![
            "Feature",
            "Type",
            "Current majority",
            "Current underestimation",
            "Current overestimation",
            "Current range (%)",
        ];
        if with_reference {
            header.extend([
                "Reference majority",
                "Reference underestimation",
                "Reference overestimation",
                "Reference range (%)",
            ]);
        }

        fn cells<T: Serialize>(values: &GroupValues<T>) -> [Value; 4] {
            [
                json!(values.majority),
                json!(values.under),
                json!(values.over),
                json!(values.range),
            ]
        }

        fn missing_cells() -> [Value; 4] {
            [Value::Null, Value::Null, Value::Null, Value::Null]
        }

        let rows = result
            .error_bias
            .iter()
            .flatten()
            .map(|(name, bias)| {
                let mut row = vec![json!(name), json!(bias.feature_type().to_string())];
                match bias {
                    FeatureBias::Numerical { current, reference } => {
                        row.extend(cells(current));
                        if with_reference {
                            row.extend(reference.as_ref().map_or_else(missing_cells, cells));
                        }
                    }
                    FeatureBias::Categorical { current, reference } => {
                        row.extend(cells(current));
                        if with_reference {
                            row.extend(reference.as_ref().map_or_else(missing_cells, cells));
                        }
                    }
                }
                row
            })
            .collect();

        vec![Widget::table("Error Bias Table", &header, rows)]
    }
}
