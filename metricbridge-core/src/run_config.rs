use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_default::DefaultFromSerde;

/// Options applying to every metric of a report run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema, DefaultFromSerde)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Keep rendering artifacts in the snapshot.
    #[serde(default = "default_true")]
    include_widgets: bool,
    /// Abort the run on the first failing metric instead of recording the failure.
    #[serde(default)]
    fail_fast: bool,
}

fn default_true() -> bool {
    true
}

impl RunConfig {
    pub fn new(include_widgets: bool, fail_fast: bool) -> RunConfig {
        RunConfig {
            include_widgets,
            fail_fast,
        }
    }

    pub fn include_widgets(&self) -> bool {
        self.include_widgets
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }
}
