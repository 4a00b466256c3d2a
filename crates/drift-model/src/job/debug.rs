use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult};

/// Configuration for the worker's model debug output.
///
/// When present, the worker writes per-bucket model bounds for the
/// configured terms alongside its normal results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDebugConfig {
    /// Percentile of the model bounds to report, in `0.0..=100.0`.
    pub bounds_percentile: f64,

    /// Comma-separated entity terms to restrict debug output to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
}

impl ModelDebugConfig {
    /// Check that the percentile is within range.
    pub fn validate(&self) -> ModelResult<()> {
        if !(0.0..=100.0).contains(&self.bounds_percentile) {
            return Err(ModelError::InvalidModelDebugConfig(format!(
                "boundsPercentile must be in [0, 100], got {}",
                self.bounds_percentile
            )));
        }
        Ok(())
    }
}

impl Default for ModelDebugConfig {
    fn default() -> Self {
        Self {
            bounds_percentile: 95.0,
            terms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ModelDebugConfig;

    #[test]
    fn default_percentile_is_valid() {
        let config = ModelDebugConfig::default();
        assert_eq!(config.bounds_percentile, 95.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_percentile_is_rejected() {
        for p in [-0.1, 100.1, f64::NAN] {
            let config = ModelDebugConfig {
                bounds_percentile: p,
                terms: None,
            };
            assert!(config.validate().is_err(), "percentile {p} must fail");
        }
    }

    #[test]
    fn serde_roundtrip_camel_case() {
        let config = ModelDebugConfig {
            bounds_percentile: 90.0,
            terms: Some("airline,host".into()),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"boundsPercentile":90.0,"terms":"airline,host"}"#);

        let back: ModelDebugConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
