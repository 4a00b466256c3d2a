//! Warm-start state for the worker's normalizer.

use std::{fs, io, path::PathBuf};

use tracing::debug;

use drift_model::JobId;

use crate::env::LaunchEnv;

/// Flag carrying the path of the normalizer state file.
pub const QUANTILES_STATE_PATH_ARG: &str = "--quantilesState=";

/// Flag telling the worker to remove consumed state files.
pub const DELETE_STATE_FILES_ARG: &str = "--deleteStateFiles";

/// Persist a normalizer state blob for `job_id` and return its path.
///
/// The path is stable per job (`<tmp_dir>/<id>_quantiles_state.json`), so
/// relaunching a job overwrites rather than accumulates. The file is
/// consumed exactly once: the launch pairs the path flag with
/// [`DELETE_STATE_FILES_ARG`] so the worker removes it after reading,
/// which is why it is not tracked as a launch artifact.
pub fn write_quantiles_state(job_id: &JobId, state: &str, env: &LaunchEnv) -> io::Result<PathBuf> {
    let path = env.tmp_dir.join(format!("{job_id}_quantiles_state.json"));
    fs::write(&path, state)?;
    debug!(job = %job_id, path = %path.display(), "wrote normalizer state");
    Ok(path)
}
