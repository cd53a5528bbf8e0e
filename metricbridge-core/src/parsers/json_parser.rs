use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    data_definition::DataDefinition,
    dataset::{Column, Dataset},
    error::{Error, Result},
    parsers::TableParser,
};

/// Reads a JSON array of row objects. Missing keys and `null` are missing cells.
#[derive(Default)]
pub struct JsonRecordsParser;

enum Cell<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
    Bool(bool),
}

impl TableParser for JsonRecordsParser {
    fn parse_table(&self, input: &str, definition: DataDefinition) -> Result<Dataset> {
        let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_str(input)?;

        let mut column_order: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !column_order.contains(key) {
                    column_order.push(key.clone());
                }
            }
        }

        let mut cells: BTreeMap<&str, Vec<Cell>> = BTreeMap::new();
        for (row_number, row) in rows.iter().enumerate() {
            for name in &column_order {
                let cell = match row.get(name) {
                    None | Some(Value::Null) => Cell::Missing,
                    Some(Value::Number(n)) => Cell::Number(n.as_f64().ok_or_else(|| {
                        Error::ParserError(format!("Row {row_number}: \"{name}\" is not a float"))
                    })?),
                    Some(Value::String(s)) => Cell::Text(s),
                    Some(Value::Bool(b)) => Cell::Bool(*b),
                    Some(other) => {
                        return Err(Error::ParserError(format!(
                            "Row {row_number}: unsupported value for \"{name}\": {other}"
                        )))
                    }
                };
                cells.entry(name.as_str()).or_default().push(cell);
            }
        }

        let columns = column_order
            .iter()
            .map(|name| {
                let values = cells.remove(name.as_str()).unwrap_or_default();
                (name.clone(), to_column(values))
            })
            .collect();

        Dataset::from_columns(columns, definition)
    }
}

fn to_column(values: Vec<Cell>) -> Column {
    let all_numbers = values
        .iter()
        .all(|c| matches!(c, Cell::Missing | Cell::Number(_)));

    if all_numbers {
        Column::Numerical(
            values
                .into_iter()
                .map(|c| match c {
                    Cell::Number(n) => Some(n),
                    _ => None,
                })
                .collect(),
        )
    } else {
        Column::Categorical(
            values
                .into_iter()
                .map(|c| match c {
                    Cell::Missing => None,
                    Cell::Number(n) => Some(n.to_string()),
                    Cell::Text(s) => Some(s.to_owned()),
                    Cell::Bool(b) => Some(b.to_string()),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dataset::ColumnType;

    #[test]
    fn test_parse_records() {
        let input = json!([
            {"target": 1.0, "prediction": 1.5, "age": 25, "segment": "a"},
            {"target": 2.0, "prediction": 1.5, "age": null, "segment": true},
            {"target": 3.0, "prediction": 2.5}
        ]);

        let dataset = JsonRecordsParser
            .parse_table(&input.to_string(), DataDefinition::new())
            .unwrap();

        assert_eq!(dataset.num_rows(), 3);
        assert!(dataset.has_default_task());
        assert_eq!(dataset.numerical("age").unwrap(), &[Some(25.0), None, None]);
        let segment = dataset.column("segment").unwrap();
        assert_eq!(segment.column_type(), ColumnType::Categorical);
        assert_eq!(segment.as_categorical().unwrap()[1].as_deref(), Some("true"));
    }

    #[test]
    fn test_nested_value_rejected() {
        let input = json!([{"target": 1.0, "prediction": 1.0, "nested": {"a": 1}}]);
        let err = JsonRecordsParser
            .parse_table(&input.to_string(), DataDefinition::new())
            .unwrap_err();
        assert!(matches!(err, Error::ParserError(_)));
    }
}
