use serde::{Deserialize, Serialize};

/// Resource limits the worker enforces on its model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisLimits {
    /// Upper bound on model memory, in megabytes.
    ///
    /// The worker stops growing the model and degrades gracefully once the
    /// bound is hit. `None` leaves the worker default in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_memory_limit_mb: Option<u64>,

    /// Maximum number of example values stored per category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorization_examples_limit: Option<u64>,
}

impl AnalysisLimits {
    /// Returns `true` if no explicit limit is configured.
    pub fn is_empty(&self) -> bool {
        self.model_memory_limit_mb.is_none() && self.categorization_examples_limit.is_none()
    }
}
