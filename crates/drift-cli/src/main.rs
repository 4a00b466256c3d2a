use std::{fs, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use drift_control::NativeController;
use drift_launch::{Controller, LaunchBuilder, LaunchEnv, ProcessPipes, WorkerSettings};
use drift_model::{Job, LookupList, Quantiles};

/// Ask the controller daemon to launch an analytics worker for one job.
#[derive(Debug, Parser)]
#[command(name = "driftlaunch", version, about)]
struct Args {
    /// Controller daemon control socket.
    #[arg(long, env = "DRIFT_CONTROL_SOCKET")]
    socket: PathBuf,

    /// Job definition (JSON).
    #[arg(long)]
    job: PathBuf,

    /// Worker settings (JSON); defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory holding the worker executable.
    #[arg(long, default_value = "/usr/lib/drift/bin")]
    bin_dir: PathBuf,

    /// Root directory for launch-scoped config artifacts.
    #[arg(long, default_value = "/var/tmp/drift")]
    tmp_dir: PathBuf,

    /// Namespace root for pipe endpoints.
    #[arg(long, default_value = "/var/run/drift")]
    pipe_dir: PathBuf,

    /// Force the worker to skip modeling the downtime gap.
    #[arg(long)]
    ignore_downtime: bool,

    /// File holding serialized normalizer state to warm-start from.
    #[arg(long)]
    quantiles: Option<PathBuf>,

    /// Lookup lists referenced by the field config (JSON array).
    #[arg(long)]
    lists: Option<PathBuf>,

    /// Confirmation timeout for the start request, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let job: Job = serde_json::from_str(
        &fs::read_to_string(&args.job)
            .with_context(|| format!("reading job file {}", args.job.display()))?,
    )
    .context("parsing job definition")?;
    job.validate().context("validating job definition")?;

    let settings = match &args.settings {
        Some(path) => serde_json::from_str(
            &fs::read_to_string(path)
                .with_context(|| format!("reading settings file {}", path.display()))?,
        )
        .context("parsing worker settings")?,
        None => WorkerSettings::default(),
    };

    let quantiles = args
        .quantiles
        .as_ref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("reading quantiles file {}", path.display()))
        })
        .transpose()?
        .map(Quantiles::new);

    let lists: Vec<LookupList> = match &args.lists {
        Some(path) => serde_json::from_str(
            &fs::read_to_string(path)
                .with_context(|| format!("reading lists file {}", path.display()))?,
        )
        .context("parsing lookup lists")?,
        None => Vec::new(),
    };

    let env = LaunchEnv::new(args.bin_dir, args.tmp_dir, args.pipe_dir);

    let controller =
        NativeController::connect(&args.socket, Duration::from_secs(args.timeout_secs))
            .with_context(|| format!("connecting to controller at {}", args.socket.display()))?;

    let mut pipes = ProcessPipes::new(&env.pipe_dir, job.id.clone(), controller.pid());
    if quantiles.is_some() {
        pipes = pipes.with_restore();
    }
    if settings.persist_model_state {
        pipes = pipes.with_persist();
    }

    let result = LaunchBuilder::new(&job, &env, &settings, &controller, &pipes)
        .with_ignore_downtime(args.ignore_downtime)
        .with_referenced_lists(lists)
        .with_quantiles(quantiles)
        .build();

    match result {
        Ok(launch) => {
            info!(job = %job.id, "worker start confirmed");
            info!(command = %launch.command.join(" "), "launched");
            for path in launch.artifacts.iter() {
                info!(path = %path.display(), "artifact to remove after the worker exits");
            }
            Ok(())
        }
        Err(failure) => {
            for path in failure.artifacts.iter() {
                warn!(path = %path.display(), "artifact left behind by failed launch");
            }
            Err(failure).context("launching worker")
        }
    }
}
