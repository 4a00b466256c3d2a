use serde::{Deserialize, Serialize};

/// Serialized normalizer state captured from a previous run of a job.
///
/// The state is an opaque blob produced by the worker; this crate never
/// inspects it. An empty blob carries no information and is treated the
/// same as no state at all by consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantiles {
    state: String,
}

impl Quantiles {
    /// Wrap a serialized state blob.
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
        }
    }

    /// The raw state blob.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns `true` if the blob carries no state.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
