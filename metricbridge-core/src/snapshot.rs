use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    metrics::{MetricId, MetricResult},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MetricOutcome {
    Success(MetricResult),
    Failed { error: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub metric_id: MetricId,
    pub typename: String,
    pub display_name: String,
    pub config: serde_json::Value,
    pub outcome: MetricOutcome,
}

impl SnapshotItem {
    pub fn result(&self) -> Result<&MetricResult> {
        match &self.outcome {
            MetricOutcome::Success(result) => Ok(result),
            MetricOutcome::Failed { error } => Err(Error::MetricFailed {
                metric: self.metric_id.to_string(),
                reason: error.clone(),
            }),
        }
    }
}

/// All published results of one report run, in declaration order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    has_reference: bool,
    metrics: Vec<SnapshotItem>,
}

impl Snapshot {
    pub fn new(has_reference: bool, metrics: Vec<SnapshotItem>) -> Snapshot {
        Snapshot {
            has_reference,
            metrics,
        }
    }

    pub fn has_reference(&self) -> bool {
        self.has_reference
    }

    pub fn metrics(&self) -> impl Iterator<Item = &SnapshotItem> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SnapshotItem> {
        self.metrics
            .iter()
            .filter(|item| matches!(item.outcome, MetricOutcome::Failed { .. }))
    }

    /// Looks a metric up by id, then by type name or display name (first match wins).
    pub fn get_metric_result(&self, name: &str) -> Result<&MetricResult> {
        self.metrics
            .iter()
            .find(|item| item.metric_id.as_str() == name)
            .or_else(|| {
                self.metrics
                    .iter()
                    .find(|item| item.typename == name || item.display_name == name)
            })
            .ok_or_else(|| Error::MetricNotFound(name.to_owned()))?
            .result()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    pub fn from_json(json: &str) -> Result<Snapshot> {
        serde_json::from_str(json)
            .map_err(|e| Error::ParserError(format!("Failed to parse snapshot: {e}")))
    }

    pub fn serialize_binary(&self) -> Result<Vec<u8>> {
        let mut s = flexbuffers::FlexbufferSerializer::new();
        self.serialize(&mut s)
            .map_err(|e| Error::ParserError(format!("Failed to serialize snapshot: {e}")))?;
        Ok(s.take_buffer())
    }

    pub fn create_from_binary(data: &[u8]) -> Result<Snapshot> {
        let reader = flexbuffers::Reader::get_root(data)
            .map_err(|e| Error::ParserError(format!("Failed to read snapshot: {e}")))?;
        Snapshot::deserialize(reader)
            .map_err(|e| Error::ParserError(format!("Failed to parse snapshot: {e}")))
    }
}
