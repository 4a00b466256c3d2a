use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Filesystem layout the launcher operates in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LaunchEnv {
    /// Directory holding the worker executable.
    pub bin_dir: PathBuf,
    /// Root for launch-scoped config artifacts and warm-start state.
    pub tmp_dir: PathBuf,
    /// Namespace root for per-launch pipe endpoints.
    pub pipe_dir: PathBuf,
}

impl LaunchEnv {
    /// Create an environment with explicit directories.
    pub fn new(
        bin_dir: impl Into<PathBuf>,
        tmp_dir: impl Into<PathBuf>,
        pipe_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            tmp_dir: tmp_dir.into(),
            pipe_dir: pipe_dir.into(),
        }
    }
}

impl Default for LaunchEnv {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("/usr/lib/drift/bin"),
            tmp_dir: PathBuf::from("/var/tmp/drift"),
            pipe_dir: PathBuf::from("/var/run/drift"),
        }
    }
}

/// Operational settings applied to every worker launched from this node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkerSettings {
    /// Cap on the anomaly records the worker reports per bucket.
    pub max_anomaly_records: u32,
    /// Base interval between background model persists, in seconds.
    ///
    /// The effective interval adds a deterministic per-job offset so
    /// workers for different jobs do not persist simultaneously.
    pub persist_interval_secs: u64,
    /// Base cap on the interval between quantile outputs, in seconds.
    /// Staggered per job like the persist interval.
    pub max_quantile_interval_secs: u64,
    /// Give the worker a persist endpoint for streaming model state out.
    pub persist_model_state: bool,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            max_anomaly_records: 500,
            persist_interval_secs: 10_800,
            max_quantile_interval_secs: 21_600,
            persist_model_state: false,
        }
    }
}
