use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult};

/// A single anomaly detector within an analysis config.
///
/// `function` names the statistic the worker models (`count`, `mean`,
/// `metric`, `rare`, ...); the optional fields split or scope the analysis
/// over the named record fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detector {
    /// Function to model, e.g. `mean` or `count`.
    pub function: String,

    /// Field the function is applied to, where the function takes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    /// Split the analysis per value of this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_field_name: Option<String>,

    /// Analyze over the population of values of this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_field_name: Option<String>,

    /// Run an independent analysis per value of this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_field_name: Option<String>,
}

impl Detector {
    /// Create a detector for the given function with no field scoping.
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Self::default()
        }
    }

    /// Check that the detector names a function.
    pub fn validate(&self) -> ModelResult<()> {
        if self.function.trim().is_empty() {
            return Err(ModelError::InvalidDetector(
                "detector function is empty".into(),
            ));
        }
        Ok(())
    }
}
