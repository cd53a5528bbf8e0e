use serde::{Deserialize, Serialize};

use crate::{
    dataset::{ColumnType, Dataset},
    error::{Error, Result},
};

/// Column mapping of one regression task as seen by a calculation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InputColumns {
    pub task_name: String,
    pub target: String,
    pub prediction: String,
    pub numerical_features: Vec<String>,
    pub categorical_features: Vec<String>,
}

/// Everything a legacy calculation reads: the tables and the resolved column mapping.
pub struct InputData<'a> {
    pub current: &'a Dataset,
    pub reference: Option<&'a Dataset>,
    pub columns: InputColumns,
}

/// Execution context of one report run.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    current: &'a Dataset,
    reference: Option<&'a Dataset>,
}

impl<'a> Context<'a> {
    pub fn new(current: &'a Dataset, reference: Option<&'a Dataset>) -> Context<'a> {
        Context { current, reference }
    }

    pub fn current(&self) -> &'a Dataset {
        self.current
    }

    pub fn reference(&self) -> Option<&'a Dataset> {
        self.reference
    }

    pub fn resolve_task_inputs(&self, task_name: &str) -> Result<InputColumns> {
        let task = self
            .current
            .definition()
            .get_regression_task(task_name)
            .ok_or_else(|| Error::TaskNotFound(task_name.to_owned()))?;

        Ok(InputColumns {
            task_name: task.name.clone(),
            target: task.target.clone(),
            prediction: task.prediction.clone(),
            numerical_features: self.current.feature_names(ColumnType::Numerical),
            categorical_features: self.current.feature_names(ColumnType::Categorical),
        })
    }

    pub fn regression_input_data(&self, task_name: &str) -> Result<InputData<'a>> {
        let columns = self.resolve_task_inputs(task_name)?;

        if let Some(reference) = self.reference {
            for column in [&columns.target, &columns.prediction] {
                reference.numerical(column).map_err(|e| match e {
                    Error::ColumnNotFound(_) => Error::ColumnNotFound(format!(
                        "Column \"{column}\" is missing from reference data"
                    )),
                    other => other,
                })?;
            }
        }

        Ok(InputData {
            current: self.current,
            reference: self.reference,
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data_definition::{DataDefinition, Regression},
        dataset::Column,
    };

    fn dataset(definition: DataDefinition) -> Dataset {
        let columns: Vec<(String, Column)> = vec![
            ("y".to_owned(), vec![1.0, 2.0].into()),
            ("y_hat".to_owned(), vec![1.5, 2.5].into()),
            ("income".to_owned(), vec![10.0, 20.0].into()),
        ];
        Dataset::from_columns(columns, definition).unwrap()
    }

    #[test]
    fn test_resolve_named_task() {
        let mut definition = DataDefinition::new();
        definition
            .add_regression_task(Regression::new("y", "y_hat").with_name("pricing"))
            .unwrap();
        let current = dataset(definition);
        let context = Context::new(&current, None);

        let inputs = context.resolve_task_inputs("pricing").unwrap();
        assert_eq!(inputs.target, "y");
        assert_eq!(inputs.prediction, "y_hat");
        assert_eq!(inputs.numerical_features, vec!["income"]);

        let err = context.resolve_task_inputs("default").unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(name) if name == "default"));
    }

    #[test]
    fn test_reference_must_have_task_columns() {
        let mut definition = DataDefinition::new();
        definition
            .add_regression_task(Regression::new("y", "y_hat"))
            .unwrap();
        let current = dataset(definition);
        let reference = Dataset::from_columns(
            vec![("y".to_owned(), vec![1.0].into())],
            DataDefinition::new(),
        )
        .unwrap();

        let context = Context::new(&current, Some(&reference));
        assert!(matches!(
            context.regression_input_data("default"),
            Err(Error::ColumnNotFound(_))
        ));
    }
}
