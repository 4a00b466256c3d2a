mod analysis;
pub use analysis::AnalysisConfig;

mod detector;
pub use detector::Detector;

mod limits;
pub use limits::AnalysisLimits;

mod debug;
pub use debug::ModelDebugConfig;

use serde::{Deserialize, Serialize};

use crate::{JobId, ModelResult};

/// Declarative description of one analytics job.
///
/// A `Job` describes *what* a worker should analyze; the launch layer turns
/// it into a concrete process invocation. All sub-configurations are
/// optional: a section that is absent simply contributes nothing to the
/// launch.
///
/// Jobs are read-only to the launch layer, which never mutates or persists
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique job identifier; keys all per-job on-disk artifacts.
    pub id: JobId,

    /// Free-form human description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Resume analysis without modeling the gap since the last run.
    #[serde(default)]
    pub ignore_downtime: bool,

    /// Shape of the input records (time field and format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_description: Option<DataDescription>,

    /// Resource limits applied to the worker's model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_limits: Option<AnalysisLimits>,

    /// Model debug output configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_debug_config: Option<ModelDebugConfig>,

    /// What to detect: detectors, influencers, bucketing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_config: Option<AnalysisConfig>,
}

impl Job {
    /// Create a job with the given id and no optional sections.
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            description: None,
            ignore_downtime: false,
            data_description: None,
            analysis_limits: None,
            model_debug_config: None,
            analysis_config: None,
        }
    }

    /// Validate the job and every sub-configuration that is present.
    pub fn validate(&self) -> ModelResult<()> {
        if let Some(debug) = &self.model_debug_config {
            debug.validate()?;
        }
        if let Some(analysis) = &self.analysis_config {
            analysis.validate()?;
        }
        Ok(())
    }
}

/// Shape of the records streamed to the worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDescription {
    /// Name of the field carrying the record timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_field: Option<String>,

    /// Timestamp format, when not epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{DataDescription, Job};
    use crate::{AnalysisConfig, Detector, JobId, ModelDebugConfig};

    fn job(id: &str) -> Job {
        Job::new(JobId::new(id).unwrap())
    }

    #[test]
    fn new_job_has_no_optional_sections() {
        let job = job("farequote");
        assert!(job.data_description.is_none());
        assert!(job.analysis_limits.is_none());
        assert!(job.model_debug_config.is_none());
        assert!(job.analysis_config.is_none());
        assert!(!job.ignore_downtime);
    }

    #[test]
    fn validate_walks_sub_configs() {
        let mut job = job("j1");
        assert!(job.validate().is_ok());

        job.model_debug_config = Some(ModelDebugConfig {
            bounds_percentile: 150.0,
            terms: None,
        });
        assert!(job.validate().is_err());

        job.model_debug_config = None;
        job.analysis_config = Some(AnalysisConfig::default());
        assert!(job.validate().is_err(), "no detectors must be rejected");

        job.analysis_config = Some(AnalysisConfig {
            detectors: vec![Detector::new("count")],
            ..AnalysisConfig::default()
        });
        assert!(job.validate().is_ok());
    }

    #[test]
    fn deserializes_with_missing_sections() {
        let job: Job = serde_json::from_str(r#"{"id":"farequote"}"#).unwrap();
        assert_eq!(job.id.as_str(), "farequote");
        assert!(!job.ignore_downtime);
        assert!(job.analysis_config.is_none());
    }

    #[test]
    fn deserializes_full_job_camel_case() {
        let json = r#"{
            "id": "farequote",
            "ignoreDowntime": true,
            "dataDescription": {"timeField": "@timestamp"},
            "analysisLimits": {"modelMemoryLimitMb": 4096},
            "analysisConfig": {
                "bucketSpanSecs": 300,
                "detectors": [{"function": "metric", "fieldName": "responsetime"}]
            }
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert!(job.ignore_downtime);
        assert_eq!(
            job.data_description.unwrap(),
            DataDescription {
                time_field: Some("@timestamp".into()),
                time_format: None,
            }
        );
        assert_eq!(
            job.analysis_limits.unwrap().model_memory_limit_mb,
            Some(4096)
        );
        let analysis = job.analysis_config.unwrap();
        assert_eq!(analysis.bucket_span_secs, Some(300));
        assert_eq!(analysis.detectors.len(), 1);
    }
}
