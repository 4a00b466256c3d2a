use serde::{Deserialize, Serialize};

use crate::{Detector, ModelError, ModelResult};

/// What the worker analyzes: detectors, influencers, and bucketing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Width of the analysis buckets, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_span_secs: Option<u64>,

    /// How far out of order records may arrive, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_secs: Option<u64>,

    /// Field carrying a pre-aggregated count, for summarized input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_count_field_name: Option<String>,

    /// Field whose values are categorized before detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorization_field_name: Option<String>,

    /// Detectors to run; at least one is required.
    #[serde(default)]
    pub detectors: Vec<Detector>,

    /// Fields reported as influencing anomalies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub influencers: Vec<String>,
}

impl AnalysisConfig {
    /// Check that at least one valid detector is configured.
    pub fn validate(&self) -> ModelResult<()> {
        if self.detectors.is_empty() {
            return Err(ModelError::InvalidAnalysisConfig(
                "at least one detector is required".into(),
            ));
        }
        for detector in &self.detectors {
            detector.validate()?;
        }
        Ok(())
    }
}
