use std::io;

use thiserror::Error;

use crate::controller::StartError;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to create {purpose} artifact: {source}")]
    Artifact {
        purpose: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {section} config: {source}")]
    Serialize {
        section: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to write quantiles state: {0}")]
    State(#[source] io::Error),

    #[error(transparent)]
    Start(#[from] StartError),
}
