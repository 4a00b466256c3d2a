use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid job id: {0}")]
    InvalidJobId(String),

    #[error("invalid analysis config: {0}")]
    InvalidAnalysisConfig(String),

    #[error("invalid detector: {0}")]
    InvalidDetector(String),

    #[error("invalid model debug config: {0}")]
    InvalidModelDebugConfig(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
