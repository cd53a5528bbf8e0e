use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_TASK_NAME: &str = "default";

/// A named regression setup: which column holds the ground truth and which the model output.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Regression {
    #[serde(default = "default_task_name")]
    pub name: String,
    pub target: String,
    pub prediction: String,
}

pub(crate) fn default_task_name() -> String {
    DEFAULT_TASK_NAME.to_owned()
}

impl Regression {
    pub fn new(target: &str, prediction: &str) -> Regression {
        Regression {
            name: default_task_name(),
            target: target.to_owned(),
            prediction: prediction.to_owned(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Regression {
        self.name = name.to_owned();
        self
    }
}

/// Column typing and regression tasks for a dataset.
///
/// Columns not listed in `numerical_columns` or `categorical_columns` keep the type they were
/// parsed with.
#[derive(Builder, Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq)]
#[builder(default)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct DataDefinition {
    #[builder(setter(into, strip_option))]
    #[serde(default)]
    numerical_columns: Option<Vec<String>>,
    #[builder(setter(into, strip_option))]
    #[serde(default)]
    categorical_columns: Option<Vec<String>>,
    #[serde(default)]
    regression: Vec<Regression>,
}

impl DataDefinition {
    pub fn new() -> DataDefinition {
        DataDefinition::default()
    }

    pub fn create_from_json(json: &str) -> Result<DataDefinition> {
        let mut parsed: DataDefinition = serde_json::from_str(json).map_err(|e| {
            Error::InvalidConfiguration(format!("Failed to parse data definition: {e}"))
        })?;

        // Task names must be unique, same as for tasks added one by one.
        let tasks = std::mem::take(&mut parsed.regression);
        for task in tasks {
            parsed.add_regression_task(task)?;
        }
        Ok(parsed)
    }

    pub fn add_regression_task(&mut self, task: Regression) -> Result<()> {
        if self.regression.iter().any(|t| t.name == task.name) {
            return Err(Error::InvalidConfiguration(format!(
                "Regression task \"{}\" is already defined",
                task.name
            )));
        }
        self.regression.push(task);
        Ok(())
    }

    pub fn numerical_columns(&self) -> Option<&[String]> {
        self.numerical_columns.as_deref()
    }

    pub fn categorical_columns(&self) -> Option<&[String]> {
        self.categorical_columns.as_deref()
    }

    pub fn regression_tasks(&self) -> &[Regression] {
        &self.regression
    }

    pub fn get_regression_task(&self, name: &str) -> Option<&Regression> {
        self.regression.iter().find(|t| t.name == name)
    }

    pub(crate) fn is_declared_numerical(&self, column: &str) -> bool {
        self.numerical_columns
            .as_ref()
            .map_or(false, |cols| cols.iter().any(|c| c == column))
    }

    pub(crate) fn is_declared_categorical(&self, column: &str) -> bool {
        self.categorical_columns
            .as_ref()
            .map_or(false, |cols| cols.iter().any(|c| c == column))
    }

    /// Columns that belong to some regression task and therefore are never features.
    pub(crate) fn task_columns(&self) -> impl Iterator<Item = &str> {
        self.regression
            .iter()
            .flat_map(|t| [t.target.as_str(), t.prediction.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_task_rejected() {
        let mut definition = DataDefinition::new();
        definition
            .add_regression_task(Regression::new("target", "prediction"))
            .unwrap();
        let err = definition
            .add_regression_task(Regression::new("y", "y_hat"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        definition
            .add_regression_task(Regression::new("y", "y_hat").with_name("pricing"))
            .unwrap();
        assert_eq!(definition.regression_tasks().len(), 2);
        assert_eq!(
            definition.get_regression_task("pricing").unwrap().target,
            "y"
        );
    }

    #[test]
    fn test_builder_and_json() {
        let definition = DataDefinitionBuilder::default()
            .categorical_columns(vec!["city".to_owned()])
            .build()
            .unwrap();
        assert!(definition.is_declared_categorical("city"));
        assert!(!definition.is_declared_numerical("city"));

        let parsed = DataDefinition::create_from_json(
            r#"{"numericalColumns": ["age"], "regression": [{"target": "y", "prediction": "p"}]}"#,
        )
        .unwrap();
        assert!(parsed.is_declared_numerical("age"));
        assert_eq!(parsed.regression_tasks()[0].name, DEFAULT_TASK_NAME);

        assert!(DataDefinition::create_from_json(r#"{"unknown": 1}"#).is_err());
    }

    #[test]
    fn test_json_duplicate_task_rejected() {
        let err = DataDefinition::create_from_json(
            r#"{"regression": [{"target": "a", "prediction": "b"}, {"target": "c", "prediction": "d"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        let parsed = DataDefinition::create_from_json(
            r#"{"regression": [{"target": "a", "prediction": "b"}, {"name": "pricing", "target": "c", "prediction": "d"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.regression_tasks().len(), 2);
    }
}
