use crate::{
    data_definition::DataDefinition,
    dataset::{Column, Dataset},
    error::{Error, Result},
    parsers::TableParser,
};

/// Comma separated reader with a header row. Empty cells are missing; a column whose cells all
/// parse as numbers is numerical.
#[derive(Default)]
pub struct CsvParser;

fn csv_error(e: csv::Error) -> Error {
    match e.position() {
        Some(position) => Error::ParserError(format!("CSV line {}: {e}", position.line())),
        None => Error::ParserError(format!("CSV: {e}")),
    }
}

impl TableParser for CsvParser {
    fn parse_table(&self, input: &str, definition: DataDefinition) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(input.as_bytes());

        let header: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|name| name.to_owned())
            .collect();
        if header.is_empty() {
            return Err(Error::ParserError("CSV input has no header row".to_owned()));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            for (column, cell) in cells.iter_mut().zip(record.iter()) {
                column.push(if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_owned())
                });
            }
        }

        let columns = header
            .into_iter()
            .zip(cells)
            .map(|(name, values)| (name, infer_column(values)))
            .collect();

        Dataset::from_columns(columns, definition)
    }
}

/// Parses a numeric cell. Non-finite values (`inf`, `nan`) count as missing.
pub(crate) fn parse_number(cell: &str) -> Option<Option<f64>> {
    fast_float::parse::<f64, _>(cell.trim())
        .ok()
        .map(|value| Some(value).filter(|v| v.is_finite()))
}

fn infer_column(values: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|v| match v {
            Some(s) => parse_number(s),
            None => Some(None),
        })
        .collect();

    match parsed {
        Some(numbers) => Column::Numerical(numbers),
        None => Column::Categorical(values),
    }
}
