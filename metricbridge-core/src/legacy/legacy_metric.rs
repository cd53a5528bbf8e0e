use serde::Serialize;

use crate::{
    context::{InputColumns, InputData},
    dataset::Dataset,
    error::{Error, Result},
    render::Widget,
    utils::complete_pairs,
};

/// A prior-generation calculation: computes a rich result from the input tables and renders it.
pub trait LegacyMetric {
    type Result: Serialize;

    fn calculate(&self, data: &InputData) -> Result<Self::Result>;
    fn render(&self, result: &Self::Result) -> Vec<Widget>;
}

/// Rows of `dataset` with both target and prediction present, as `(row, target, prediction)`.
///
/// `label` names the table ("current" or "reference") in the error.
pub(crate) fn regression_rows(
    dataset: &Dataset,
    columns: &InputColumns,
    label: &str,
) -> Result<Vec<(usize, f64, f64)>> {
    let target = dataset.numerical(&columns.target)?;
    let prediction = dataset.numerical(&columns.prediction)?;
    let rows: Vec<_> = complete_pairs(target, prediction).collect();
    if rows.is_empty() {
        return Err(Error::EmptyData(format!(
            "{label} data has no rows with both \"{}\" and \"{}\"",
            columns.target, columns.prediction
        )));
    }
    Ok(rows)
}
