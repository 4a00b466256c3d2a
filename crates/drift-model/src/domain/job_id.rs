use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Validated job identifier.
///
/// The id keys every per-job artifact on disk (config files, warm-start
/// state, pipe names), so the charset is restricted to lowercase ASCII
/// alphanumerics plus `-` and `_`. Must start with an alphanumeric and
/// fit in [`JobId::MAX_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Maximum id length in bytes.
    pub const MAX_LEN: usize = 64;

    /// Parse and validate a job id.
    pub fn new(id: impl Into<String>) -> Result<Self, ModelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::InvalidJobId("id is empty".into()));
        }
        if id.len() > Self::MAX_LEN {
            return Err(ModelError::InvalidJobId(format!(
                "id exceeds {} bytes",
                Self::MAX_LEN
            )));
        }

        let first = id.chars().next().unwrap_or_default();
        if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
            return Err(ModelError::InvalidJobId(format!(
                "id must start with a lowercase alphanumeric, got '{first}'"
            )));
        }
        if let Some(c) = id
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
        {
            return Err(ModelError::InvalidJobId(format!(
                "illegal character '{c}' in id"
            )));
        }
        Ok(Self(id))
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for JobId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for JobId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}
