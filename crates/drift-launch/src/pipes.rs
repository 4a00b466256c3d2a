//! Streaming endpoints handed to the worker.

use std::path::PathBuf;

use drift_model::JobId;

/// Flag carrying the worker's log endpoint.
pub const LOG_PIPE_ARG: &str = "--logPipe=";
/// Flag carrying the record input endpoint.
pub const INPUT_PIPE_ARG: &str = "--input=";
/// Flag carrying the result output endpoint.
pub const OUTPUT_PIPE_ARG: &str = "--output=";
/// Flag carrying the endpoint prior model state is streamed in on.
pub const RESTORE_PIPE_ARG: &str = "--restore=";
/// Flag carrying the endpoint model state is streamed out on.
pub const PERSIST_PIPE_ARG: &str = "--persist=";

/// Named channels the worker attaches to once started.
///
/// Names are keyed by job id and controller pid so concurrent launches of
/// different jobs, or under different daemons, never collide. This layer
/// only appends the endpoints as trailing arguments; creating the channels
/// and the post-start handshake happen elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPipes {
    dir: PathBuf,
    job_id: JobId,
    controller_pid: u32,
    restore: bool,
    persist: bool,
}

impl ProcessPipes {
    /// Name the log, input, and output endpoints for one launch.
    pub fn new(pipe_dir: impl Into<PathBuf>, job_id: JobId, controller_pid: u32) -> Self {
        Self {
            dir: pipe_dir.into(),
            job_id,
            controller_pid,
            restore: false,
            persist: false,
        }
    }

    /// Also give the worker a restore endpoint for streaming prior model
    /// state in.
    pub fn with_restore(mut self) -> Self {
        self.restore = true;
        self
    }

    /// Also give the worker a persist endpoint for streaming model state
    /// out.
    pub fn with_persist(mut self) -> Self {
        self.persist = true;
        self
    }

    fn endpoint(&self, kind: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{kind}_{}", self.job_id, self.controller_pid))
    }

    /// Append the endpoint arguments to an in-progress command.
    pub fn add_args(&self, command: &mut Vec<String>) {
        command.push(format!("{LOG_PIPE_ARG}{}", self.endpoint("log").display()));
        command.push(format!(
            "{INPUT_PIPE_ARG}{}",
            self.endpoint("input").display()
        ));
        command.push(format!(
            "{OUTPUT_PIPE_ARG}{}",
            self.endpoint("output").display()
        ));
        if self.restore {
            command.push(format!(
                "{RESTORE_PIPE_ARG}{}",
                self.endpoint("restore").display()
            ));
        }
        if self.persist {
            command.push(format!(
                "{PERSIST_PIPE_ARG}{}",
                self.endpoint("persist").display()
            ));
        }
    }
}
