mod domain;
pub use domain::{JobId, LookupList, Quantiles};

mod error;
pub use error::{ModelError, ModelResult};

mod job;
pub use job::{AnalysisConfig, AnalysisLimits, DataDescription, Detector, Job, ModelDebugConfig};
