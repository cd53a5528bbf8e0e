use std::collections::BTreeMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    data_definition::{DataDefinition, Regression, DEFAULT_TASK_NAME},
    error::{Error, Result},
    parsers::parse_number,
};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum ColumnType {
    Numerical,
    Categorical,
}

/// One column of a table. Missing cells are `None`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub enum Column {
    Numerical(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numerical(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Numerical(_) => ColumnType::Numerical,
            Column::Categorical(_) => ColumnType::Categorical,
        }
    }

    pub fn as_numerical(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numerical(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Categorical(values) => Some(values),
            _ => None,
        }
    }

    fn into_categorical(self) -> Column {
        match self {
            Column::Numerical(values) => Column::Categorical(
                values
                    .into_iter()
                    .map(|v| v.map(format_category))
                    .collect(),
            ),
            categorical => categorical,
        }
    }

    fn into_numerical(self, name: &str) -> Result<Column> {
        match self {
            Column::Categorical(values) => {
                let parsed = values
                    .into_iter()
                    .map(|v| match v {
                        Some(s) => parse_number(&s).ok_or_else(|| {
                            Error::InvalidConfiguration(format!(
                                "Column \"{name}\" is declared numerical but contains \"{s}\""
                            ))
                        }),
                        None => Ok(None),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Column::Numerical(parsed))
            }
            numerical => Ok(numerical),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Numerical(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::Categorical(values.into_iter().map(|s| Some(s.to_owned())).collect())
    }
}

/// Integral values print without a fractional part so `25.0` becomes the category `"25"`.
fn format_category(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// An in-memory table plus the definition describing its columns and regression tasks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dataset {
    column_order: Vec<String>,
    columns: BTreeMap<String, Column>,
    definition: DataDefinition,
    num_rows: usize,
}

impl Dataset {
    pub fn from_columns(
        columns: Vec<(String, Column)>,
        mut definition: DataDefinition,
    ) -> Result<Dataset> {
        let num_rows = columns.first().map_or(0, |(_, c)| c.len());
        let mut column_order = Vec::with_capacity(columns.len());
        let mut by_name = BTreeMap::new();

        for (name, column) in columns {
            if column.len() != num_rows {
                return Err(Error::InvalidArgument(format!(
                    "Column \"{name}\" has {} rows, expected {num_rows}",
                    column.len()
                )));
            }
            if by_name.contains_key(&name) {
                return Err(Error::InvalidArgument(format!(
                    "Column \"{name}\" is defined more than once"
                )));
            }

            let numerical = definition.is_declared_numerical(&name);
            let categorical = definition.is_declared_categorical(&name);
            let column = match (numerical, categorical) {
                (true, true) => {
                    return Err(Error::InvalidConfiguration(format!(
                        "Column \"{name}\" cannot be both numerical and categorical"
                    )))
                }
                (true, false) => column.into_numerical(&name)?,
                (false, true) => column.into_categorical(),
                (false, false) => column,
            };

            column_order.push(name.clone());
            by_name.insert(name, column);
        }

        for declared in definition
            .numerical_columns()
            .unwrap_or_default()
            .iter()
            .chain(definition.categorical_columns().unwrap_or_default())
        {
            if !by_name.contains_key(declared) {
                return Err(Error::ColumnNotFound(format!(
                    "Declared column \"{declared}\" is not present in the data"
                )));
            }
        }

        if definition.regression_tasks().is_empty() {
            let is_numerical = |name: &str| {
                by_name
                    .get(name)
                    .map_or(false, |c: &Column| c.column_type() == ColumnType::Numerical)
            };
            if is_numerical("target") && is_numerical("prediction") {
                tracing::debug!("Inferred default regression task from target/prediction columns");
                definition.add_regression_task(Regression::new("target", "prediction"))?;
            }
        }

        for task in definition.regression_tasks() {
            for column in [&task.target, &task.prediction] {
                match by_name.get(column) {
                    None => {
                        return Err(Error::ColumnNotFound(format!(
                            "Column \"{column}\" of regression task \"{}\" is not present in the data",
                            task.name
                        )))
                    }
                    Some(Column::Categorical(_)) => {
                        return Err(Error::InvalidConfiguration(format!(
                            "Column \"{column}\" of regression task \"{}\" must be numerical",
                            task.name
                        )))
                    }
                    Some(Column::Numerical(_)) => {}
                }
            }
        }

        Ok(Dataset {
            column_order,
            columns: by_name,
            definition,
            num_rows,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn definition(&self) -> &DataDefinition {
        &self.definition
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.column_order.iter().map(|s| s.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn numerical(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.columns.get(name) {
            Some(Column::Numerical(values)) => Ok(values),
            Some(Column::Categorical(_)) => Err(Error::InvalidConfiguration(format!(
                "Column \"{name}\" is not numerical"
            ))),
            None => Err(Error::ColumnNotFound(name.to_owned())),
        }
    }

    /// Feature columns of the given type: everything except the target and prediction columns of
    /// any regression task, in column order.
    pub fn feature_names(&self, column_type: ColumnType) -> Vec<String> {
        let excluded: Vec<&str> = self.definition.task_columns().collect();
        self.column_order
            .iter()
            .filter(|name| !excluded.contains(&name.as_str()))
            .filter(|name| self.columns[name.as_str()].column_type() == column_type)
            .cloned()
            .collect()
    }

    pub fn has_default_task(&self) -> bool {
        self.definition
            .get_regression_task(DEFAULT_TASK_NAME)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_definition::DataDefinitionBuilder;

    fn columns() -> Vec<(String, Column)> {
        vec![
            ("target".to_owned(), vec![1.0, 2.0, 3.0].into()),
            ("prediction".to_owned(), vec![1.1, 1.9, 3.2].into()),
            ("age".to_owned(), vec![25.0, 35.0, 45.0].into()),
            ("city".to_owned(), vec!["a", "b", "a"].into()),
        ]
    }

    #[test]
    fn test_default_task_inferred() {
        let dataset = Dataset::from_columns(columns(), DataDefinition::new()).unwrap();
        assert_eq!(dataset.num_rows(), 3);
        assert!(dataset.has_default_task());
        assert_eq!(dataset.feature_names(ColumnType::Numerical), vec!["age"]);
        assert_eq!(dataset.feature_names(ColumnType::Categorical), vec!["city"]);
    }

    #[test]
    fn test_declared_types_convert() {
        let definition = DataDefinitionBuilder::default()
            .categorical_columns(vec!["age".to_owned()])
            .build()
            .unwrap();
        let dataset = Dataset::from_columns(columns(), definition).unwrap();
        let age = dataset.column("age").unwrap().as_categorical().unwrap();
        assert_eq!(age[0].as_deref(), Some("25"));
        assert_eq!(
            dataset.feature_names(ColumnType::Categorical),
            vec!["age", "city"]
        );
    }

    #[test]
    fn test_declared_numerical_must_parse() {
        let definition = DataDefinitionBuilder::default()
            .numerical_columns(vec!["city".to_owned()])
            .build()
            .unwrap();
        let err = Dataset::from_columns(columns(), definition).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let mut cols = columns();
        cols.push(("short".to_owned(), vec![1.0].into()));
        assert!(matches!(
            Dataset::from_columns(cols, DataDefinition::new()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_task_columns_must_exist() {
        let mut definition = DataDefinition::new();
        definition
            .add_regression_task(Regression::new("price", "prediction"))
            .unwrap();
        assert!(matches!(
            Dataset::from_columns(columns(), definition),
            Err(Error::ColumnNotFound(_))
        ));
    }
}
