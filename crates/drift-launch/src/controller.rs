use std::{io, time::Duration};

use thiserror::Error;

/// Client-side capability of the controller daemon.
///
/// The daemon is the only component privileged to create worker processes;
/// this layer only ever asks it to. Implementations are synchronous:
/// [`Controller::start_process`] blocks until the daemon confirms the
/// start, the channel fails, or the implementation's timeout elapses.
pub trait Controller {
    /// Stable identity of the daemon process, used for supervisor-side
    /// correlation of launches.
    fn pid(&self) -> u32;

    /// Ask the daemon to start a worker with the given command.
    ///
    /// A start request is not abortable once issued and is never retried
    /// at this layer.
    fn start_process(&self, command: &[String]) -> Result<(), StartError>;
}

/// Failure of a start request.
///
/// A timeout is distinct from a channel failure: an overloaded daemon is a
/// transient condition the caller may retry against, while a broken
/// channel or a rejected command usually is not.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("controller did not confirm start within {timeout:?}")]
    TimedOut { timeout: Duration },

    #[error("controller rejected start request: {0}")]
    Rejected(String),

    #[error("control channel error: {0}")]
    Io(#[from] io::Error),
}
