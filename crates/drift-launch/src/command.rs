//! Base command assembly for the worker process.
//!
//! Flag tokens are a fixed contract with the worker binary's argument
//! parser and must match byte for byte.

use drift_model::{Job, JobId};
use tracing::trace;

use crate::env::{LaunchEnv, WorkerSettings};

/// Worker executable name, resolved under [`LaunchEnv::bin_dir`].
pub const WORKER_BIN: &str = "driftdetect";

pub const JOB_ID_ARG: &str = "--jobid=";
pub const LENGTH_ENCODED_INPUT_ARG: &str = "--lengthEncodedInput";
pub const MAX_ANOMALY_RECORDS_ARG: &str = "--maxAnomalyRecords=";
pub const PERSIST_INTERVAL_ARG: &str = "--persistInterval=";
pub const MAX_QUANTILE_INTERVAL_ARG: &str = "--maxQuantileInterval=";
pub const BUCKET_SPAN_ARG: &str = "--bucketspan=";
pub const LATENCY_ARG: &str = "--latency=";
pub const SUMMARY_COUNT_FIELD_ARG: &str = "--summarycountfield=";
pub const TIME_FIELD_ARG: &str = "--timefield=";
pub const IGNORE_DOWNTIME_ARG: &str = "--ignoreDowntime";
pub const CONTROLLER_PID_ARG: &str = "--controllerpid=";

/// Width of the per-job staggering window, in seconds.
const STAGGER_WINDOW_SECS: u64 = 3_600;

/// Deterministic per-job offset in `[0, STAGGER_WINDOW_SECS)`.
///
/// Spreads persist and quantile output across jobs so workers sharing a
/// node do not all write state at the same instant. FNV-1a over the id
/// bytes: stable across runs and toolchains, unlike the stdlib hasher.
fn stagger_offset_secs(job_id: &JobId) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in job_id.as_str().bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash % STAGGER_WINDOW_SECS
}

/// Build the base worker command: executable path plus the flags derived
/// from the job identity, environment, settings, and the ignore-downtime
/// override. Optional config-file flags are appended later by the launch
/// builder.
pub fn build_worker_command(
    env: &LaunchEnv,
    settings: &WorkerSettings,
    job: &Job,
    ignore_downtime: bool,
    controller_pid: u32,
) -> Vec<String> {
    let executable = env.bin_dir.join(WORKER_BIN);
    let stagger = stagger_offset_secs(&job.id);

    let mut command = vec![
        executable.to_string_lossy().into_owned(),
        format!("{JOB_ID_ARG}{}", job.id),
        LENGTH_ENCODED_INPUT_ARG.to_string(),
        format!("{MAX_ANOMALY_RECORDS_ARG}{}", settings.max_anomaly_records),
        format!(
            "{PERSIST_INTERVAL_ARG}{}",
            settings.persist_interval_secs + stagger
        ),
        format!(
            "{MAX_QUANTILE_INTERVAL_ARG}{}",
            settings.max_quantile_interval_secs + stagger
        ),
    ];

    if let Some(analysis) = &job.analysis_config {
        if let Some(span) = analysis.bucket_span_secs {
            command.push(format!("{BUCKET_SPAN_ARG}{span}"));
        }
        if let Some(latency) = analysis.latency_secs {
            command.push(format!("{LATENCY_ARG}{latency}"));
        }
        if let Some(field) = &analysis.summary_count_field_name {
            command.push(format!("{SUMMARY_COUNT_FIELD_ARG}{field}"));
        }
    }

    if let Some(data) = &job.data_description {
        if let Some(field) = &data.time_field {
            command.push(format!("{TIME_FIELD_ARG}{field}"));
        }
    }

    // The override can force the flag on but never suppress the job config.
    if ignore_downtime || job.ignore_downtime {
        command.push(IGNORE_DOWNTIME_ARG.to_string());
    }

    command.push(format!("{CONTROLLER_PID_ARG}{controller_pid}"));

    trace!(job = %job.id, args = command.len(), "assembled base worker command");
    command
}
