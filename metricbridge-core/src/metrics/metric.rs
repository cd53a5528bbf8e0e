use std::hash::Hasher;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::{context::Context, error::Result, render::Widget};

/// The published result of a metric for one table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SingleValue {
    pub value: f64,
    pub widgets: Vec<Widget>,
}

impl SingleValue {
    pub fn new(value: f64) -> SingleValue {
        SingleValue {
            value,
            widgets: Vec::new(),
        }
    }

    pub fn with_widgets(mut self, widgets: Vec<Widget>) -> SingleValue {
        self.widgets = widgets;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetricResult {
    pub current: SingleValue,
    pub reference: Option<SingleValue>,
}

impl MetricResult {
    pub fn current_only(current: SingleValue) -> MetricResult {
        MetricResult {
            current,
            reference: None,
        }
    }
}

/// Identifies a metric declaration: type name plus a fingerprint of its parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct MetricId(String);

impl MetricId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A metric declaration under the report API.
///
/// Declarations are plain configuration; `calculate` reads the context and produces a fresh
/// result without keeping any state, so a declaration can be shared across threads and runs.
#[typetag::serde(tag = "typename", content = "config")]
pub trait Metric: Send + Sync {
    fn typename(&self) -> String;
    fn display_name(&self) -> String;
    fn calculate(&self, context: &Context) -> Result<MetricResult>;
}

/// Configuration of a declaration as stored in report files and snapshots.
pub fn metric_config(metric: &dyn Metric) -> serde_json::Value {
    match serde_json::to_value(metric) {
        Ok(mut value) => value["config"].take(),
        Err(_) => serde_json::Value::Null,
    }
}

pub fn metric_id(metric: &dyn Metric) -> MetricId {
    let config = metric_config(metric).to_string();
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(metric.typename().as_bytes());
    hasher.write(config.as_bytes());
    MetricId(format!("{}-{:016x}", metric.typename(), hasher.finish()))
}
