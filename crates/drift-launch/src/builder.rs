//! The worker launch builder.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

use drift_model::{Job, LookupList, Quantiles};

use crate::{
    command::build_worker_command,
    controller::Controller,
    env::{LaunchEnv, WorkerSettings},
    error::LaunchError,
    pipes::ProcessPipes,
    scratch::{Artifacts, create_conf_file},
    state::{DELETE_STATE_FILES_ARG, QUANTILES_STATE_PATH_ARG, write_quantiles_state},
    writer::ConfigWriters,
};

/// Flag carrying the limits config artifact path.
pub const LIMIT_CONFIG_ARG: &str = "--limitconfig=";
/// Flag carrying the model debug config artifact path.
pub const MODEL_DEBUG_CONFIG_ARG: &str = "--modeldebugconfig=";
/// Flag carrying the field config artifact path.
pub const FIELD_CONFIG_ARG: &str = "--fieldconfig=";

/// A successfully requested launch.
#[derive(Debug)]
pub struct Launch {
    /// The exact command handed to the controller.
    pub command: Vec<String>,
    /// Artifacts created for this launch, owed a cleanup by the owner once
    /// the worker is done with them.
    pub artifacts: Artifacts,
}

/// A failed build.
///
/// Artifacts created before the failing stage are carried here so the
/// owner can still clean them up; no outcome leaves a file untracked.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct BuildFailure {
    /// Paths created before the failure, still owed a cleanup.
    pub artifacts: Artifacts,
    /// What stopped the build.
    #[source]
    pub cause: LaunchError,
}

/// Assembles one worker launch and hands it to the controller daemon.
///
/// A builder is bound to exactly one job and consumed by [`build`]. The
/// optional inputs (ignore-downtime override, referenced lookup lists,
/// warm-start quantiles) start absent and are supplied through the
/// `with_*` setters.
///
/// Builders are single-owner: concurrent launches use one builder per job,
/// sharing only the borrowed environment, settings, and controller.
///
/// [`build`]: LaunchBuilder::build
#[derive(Debug)]
pub struct LaunchBuilder<'a, C: Controller> {
    job: &'a Job,
    env: &'a LaunchEnv,
    settings: &'a WorkerSettings,
    controller: &'a C,
    pipes: &'a ProcessPipes,
    writers: ConfigWriters,
    ignore_downtime: bool,
    referenced_lists: Vec<LookupList>,
    quantiles: Option<Quantiles>,
}

impl<'a, C: Controller> LaunchBuilder<'a, C> {
    /// Bind a builder to one job.
    pub fn new(
        job: &'a Job,
        env: &'a LaunchEnv,
        settings: &'a WorkerSettings,
        controller: &'a C,
        pipes: &'a ProcessPipes,
    ) -> Self {
        Self {
            job,
            env,
            settings,
            controller,
            pipes,
            writers: ConfigWriters::default(),
            ignore_downtime: false,
            referenced_lists: Vec::new(),
            quantiles: None,
        }
    }

    /// Force the ignore-downtime flag on, regardless of the job config.
    pub fn with_ignore_downtime(mut self, ignore_downtime: bool) -> Self {
        self.ignore_downtime = ignore_downtime;
        self
    }

    /// Set the lookup lists the field config references. The last call
    /// wins; the default is no lists.
    pub fn with_referenced_lists(mut self, lists: Vec<LookupList>) -> Self {
        self.referenced_lists = lists;
        self
    }

    /// Set the normalizer state to warm-start from, if any. An empty blob
    /// is treated the same as no state.
    pub fn with_quantiles(mut self, quantiles: Option<Quantiles>) -> Self {
        self.quantiles = quantiles;
        self
    }

    /// Replace the config-section writers.
    pub fn with_writers(mut self, writers: ConfigWriters) -> Self {
        self.writers = writers;
        self
    }

    /// Assemble the launch and ask the controller to start the worker.
    ///
    /// Stages run in a fixed order: base command, limits config, model
    /// debug config, quantiles warm-start, field config, pipe endpoints,
    /// start request. Each optional stage is skipped when its section is
    /// absent, so every config flag appears at most once.
    ///
    /// Every artifact is recorded the moment it is created and the full
    /// set is in hand before the start request goes out: a failure in a
    /// later stage, including a start timeout, still returns every path
    /// in [`BuildFailure::artifacts`].
    pub fn build(self) -> Result<Launch, BuildFailure> {
        let mut artifacts = Artifacts::new();
        match self.assemble(&mut artifacts) {
            Ok(command) => Ok(Launch { command, artifacts }),
            Err(cause) => Err(BuildFailure { artifacts, cause }),
        }
    }

    fn assemble(&self, artifacts: &mut Artifacts) -> Result<Vec<String>, LaunchError> {
        let mut command = build_worker_command(
            self.env,
            self.settings,
            self.job,
            self.ignore_downtime,
            self.controller.pid(),
        );

        self.append_limits(&mut command, artifacts)?;
        self.append_model_debug(&mut command, artifacts)?;
        self.append_quantiles(&mut command)?;
        self.append_field_config(&mut command, artifacts)?;
        self.pipes.add_args(&mut command);

        debug!(job = %self.job.id, args = command.len(), "requesting worker start");
        self.controller.start_process(&command)?;
        Ok(command)
    }

    fn append_limits(
        &self,
        command: &mut Vec<String>,
        artifacts: &mut Artifacts,
    ) -> Result<(), LaunchError> {
        let Some(limits) = &self.job.analysis_limits else {
            return Ok(());
        };
        let path = self.create_artifact("limitconfig", artifacts)?;
        write_section(&path, "limits", |out| {
            self.writers.limits.write_limits(limits, out)
        })?;
        command.push(format!("{LIMIT_CONFIG_ARG}{}", path.display()));
        Ok(())
    }

    fn append_model_debug(
        &self,
        command: &mut Vec<String>,
        artifacts: &mut Artifacts,
    ) -> Result<(), LaunchError> {
        let Some(config) = &self.job.model_debug_config else {
            return Ok(());
        };
        let path = self.create_artifact("modeldebugconfig", artifacts)?;
        write_section(&path, "model debug", |out| {
            self.writers.debug.write_debug_config(config, out)
        })?;
        command.push(format!("{MODEL_DEBUG_CONFIG_ARG}{}", path.display()));
        Ok(())
    }

    /// The state-path flag and the delete flag travel as a pair: the state
    /// file lives outside the artifact set, so the worker must be the one
    /// to remove it.
    fn append_quantiles(&self, command: &mut Vec<String>) -> Result<(), LaunchError> {
        let Some(quantiles) = &self.quantiles else {
            return Ok(());
        };
        if quantiles.is_empty() {
            return Ok(());
        }

        info!(job = %self.job.id, "restoring quantiles");
        let path = write_quantiles_state(&self.job.id, quantiles.state(), self.env)
            .map_err(LaunchError::State)?;
        command.push(format!("{QUANTILES_STATE_PATH_ARG}{}", path.display()));
        command.push(DELETE_STATE_FILES_ARG.to_string());
        Ok(())
    }

    fn append_field_config(
        &self,
        command: &mut Vec<String>,
        artifacts: &mut Artifacts,
    ) -> Result<(), LaunchError> {
        let Some(config) = &self.job.analysis_config else {
            return Ok(());
        };
        let path = self.create_artifact("fieldconfig", artifacts)?;
        write_section(&path, "field", |out| {
            self.writers
                .fields
                .write_field_config(config, &self.referenced_lists, out)
        })?;
        command.push(format!("{FIELD_CONFIG_ARG}{}", path.display()));
        Ok(())
    }

    /// Create one temp artifact and record it before anything can fail.
    fn create_artifact(
        &self,
        purpose: &'static str,
        artifacts: &mut Artifacts,
    ) -> Result<PathBuf, LaunchError> {
        let path = create_conf_file(&self.env.tmp_dir, purpose)
            .map_err(|source| LaunchError::Artifact { purpose, source })?;
        artifacts.push(path.clone());
        Ok(path)
    }
}

/// Serialize one config section into its artifact and close the file, so
/// the path dereferences to complete content by the time the worker reads
/// it.
fn write_section(
    path: &Path,
    section: &'static str,
    write: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> Result<(), LaunchError> {
    let wrap = |source| LaunchError::Serialize { section, source };
    let file = File::create(path).map_err(wrap)?;
    let mut out = BufWriter::new(file);
    write(&mut out).map_err(wrap)?;
    out.flush().map_err(wrap)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        io::{self, Write},
        rc::Rc,
        time::Duration,
    };

    use super::{FIELD_CONFIG_ARG, LIMIT_CONFIG_ARG, LaunchBuilder, MODEL_DEBUG_CONFIG_ARG};
    use crate::{
        controller::{Controller, StartError},
        env::{LaunchEnv, WorkerSettings},
        error::LaunchError,
        pipes::ProcessPipes,
        state::{DELETE_STATE_FILES_ARG, QUANTILES_STATE_PATH_ARG},
        writer::{ConfigWriters, FieldConfigWriter},
    };
    use drift_model::{
        AnalysisConfig, AnalysisLimits, Detector, Job, JobId, LookupList, ModelDebugConfig,
        Quantiles,
    };

    struct RecordingController {
        started: RefCell<Vec<Vec<String>>>,
    }

    impl RecordingController {
        fn new() -> Self {
            Self {
                started: RefCell::new(Vec::new()),
            }
        }
    }

    impl Controller for RecordingController {
        fn pid(&self) -> u32 {
            42
        }

        fn start_process(&self, command: &[String]) -> Result<(), StartError> {
            self.started.borrow_mut().push(command.to_vec());
            Ok(())
        }
    }

    struct TimingOutController;

    impl Controller for TimingOutController {
        fn pid(&self) -> u32 {
            42
        }

        fn start_process(&self, _command: &[String]) -> Result<(), StartError> {
            Err(StartError::TimedOut {
                timeout: Duration::from_secs(5),
            })
        }
    }

    struct FailingFieldWriter;

    impl FieldConfigWriter for FailingFieldWriter {
        fn write_field_config(
            &self,
            _config: &AnalysisConfig,
            _lists: &[LookupList],
            _out: &mut dyn Write,
        ) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    struct CapturingFieldWriter(Rc<RefCell<Vec<String>>>);

    impl FieldConfigWriter for CapturingFieldWriter {
        fn write_field_config(
            &self,
            _config: &AnalysisConfig,
            lists: &[LookupList],
            out: &mut dyn Write,
        ) -> io::Result<()> {
            *self.0.borrow_mut() = lists.iter().map(|l| l.id().to_string()).collect();
            writeln!(out, "captured")
        }
    }

    struct Fixture {
        env: LaunchEnv,
        settings: WorkerSettings,
        pipes: ProcessPipes,
        _tmp: tempfile::TempDir,
    }

    fn fixture(job: &Job) -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        Fixture {
            env: LaunchEnv::new("/opt/drift/bin", tmp.path(), "/run/drift"),
            settings: WorkerSettings::default(),
            pipes: ProcessPipes::new("/run/drift", job.id.clone(), 42),
            _tmp: tmp,
        }
    }

    fn job(id: &str) -> Job {
        Job::new(JobId::new(id).unwrap())
    }

    fn limits() -> AnalysisLimits {
        AnalysisLimits {
            model_memory_limit_mb: Some(4096),
            categorization_examples_limit: None,
        }
    }

    fn analysis() -> AnalysisConfig {
        AnalysisConfig {
            bucket_span_secs: Some(300),
            detectors: vec![Detector::new("count")],
            ..AnalysisConfig::default()
        }
    }

    fn flags_with_prefix(command: &[String], prefix: &str) -> Vec<String> {
        command
            .iter()
            .filter(|a| a.starts_with(prefix))
            .cloned()
            .collect()
    }

    #[test]
    fn bare_job_builds_base_command_and_pipe_args_only() {
        let job = job("j1");
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let launch = LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .build()
            .unwrap();

        for prefix in [
            LIMIT_CONFIG_ARG,
            MODEL_DEBUG_CONFIG_ARG,
            FIELD_CONFIG_ARG,
            QUANTILES_STATE_PATH_ARG,
        ] {
            assert!(flags_with_prefix(&launch.command, prefix).is_empty());
        }
        assert!(launch.artifacts.is_empty());
        assert!(launch.command.iter().any(|a| a.starts_with("--logPipe=")));
        assert!(launch.command.last().unwrap().starts_with("--output="));
        assert_eq!(controller.started.borrow().len(), 1);
    }

    #[test]
    fn limits_create_one_artifact_and_one_flag() {
        let mut job = job("j1");
        job.analysis_limits = Some(limits());
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let launch = LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .build()
            .unwrap();

        let flags = flags_with_prefix(&launch.command, LIMIT_CONFIG_ARG);
        assert_eq!(flags.len(), 1);
        assert_eq!(launch.artifacts.len(), 1);

        let path = flags[0].strip_prefix(LIMIT_CONFIG_ARG).unwrap();
        assert_eq!(launch.artifacts.paths()[0].to_str().unwrap(), path);
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("modelmemorylimit = 4096"));
    }

    #[test]
    fn empty_quantiles_are_treated_as_absent() {
        let job = job("j1");
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let launch = LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .with_quantiles(Some(Quantiles::default()))
            .build()
            .unwrap();

        assert!(flags_with_prefix(&launch.command, QUANTILES_STATE_PATH_ARG).is_empty());
        assert!(!launch.command.iter().any(|a| a == DELETE_STATE_FILES_ARG));
        assert!(!fx.env.tmp_dir.join("j1_quantiles_state.json").exists());
    }

    #[test]
    fn quantiles_append_state_path_and_delete_flag_as_a_pair() {
        let job = job("farequote");
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let launch = LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .with_quantiles(Some(Quantiles::new("abc123")))
            .build()
            .unwrap();

        let state_idx = launch
            .command
            .iter()
            .position(|a| a.starts_with(QUANTILES_STATE_PATH_ARG))
            .expect("state path flag present");
        assert_eq!(launch.command[state_idx + 1], DELETE_STATE_FILES_ARG);

        let path = launch.command[state_idx]
            .strip_prefix(QUANTILES_STATE_PATH_ARG)
            .unwrap();
        assert!(path.ends_with("farequote_quantiles_state.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "abc123");

        // The worker deletes the state file; it is not a launch artifact.
        assert!(launch.artifacts.is_empty());
    }

    #[test]
    fn referenced_lists_last_call_wins() {
        let mut job = job("j1");
        job.analysis_config = Some(analysis());
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let writers = ConfigWriters {
            fields: Box::new(CapturingFieldWriter(Rc::clone(&seen))),
            ..ConfigWriters::default()
        };

        LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .with_writers(writers)
            .with_referenced_lists(vec![LookupList::new("first", ["x"])])
            .with_referenced_lists(vec![
                LookupList::new("second", ["y"]),
                LookupList::new("third", ["z"]),
            ])
            .build()
            .unwrap();

        assert_eq!(*seen.borrow(), ["second", "third"]);
    }

    #[test]
    fn referenced_lists_default_to_empty() {
        let mut job = job("j1");
        job.analysis_config = Some(analysis());
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let seen = Rc::new(RefCell::new(vec!["sentinel".to_string()]));
        let writers = ConfigWriters {
            fields: Box::new(CapturingFieldWriter(Rc::clone(&seen))),
            ..ConfigWriters::default()
        };

        LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .with_writers(writers)
            .build()
            .unwrap();

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn failing_serializer_still_reports_earlier_artifacts() {
        let mut job = job("j1");
        job.analysis_limits = Some(limits());
        job.analysis_config = Some(analysis());
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let writers = ConfigWriters {
            fields: Box::new(FailingFieldWriter),
            ..ConfigWriters::default()
        };

        let failure = LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .with_writers(writers)
            .build()
            .unwrap_err();

        assert!(matches!(
            failure.cause,
            LaunchError::Serialize { section: "field", .. }
        ));
        // The limits artifact and the already-created field artifact are
        // both tracked.
        assert_eq!(failure.artifacts.len(), 2);
        assert!(controller.started.borrow().is_empty(), "no start on failure");
    }

    #[test]
    fn end_to_end_limits_and_field_config() {
        let mut job = job("farequote");
        job.analysis_limits = Some(limits());
        job.analysis_config = Some(analysis());
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let launch = LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .with_ignore_downtime(true)
            .build()
            .unwrap();

        assert!(launch.command.iter().any(|a| a == "--ignoreDowntime"));
        assert!(
            flags_with_prefix(&launch.command, MODEL_DEBUG_CONFIG_ARG).is_empty(),
            "no debug config was set"
        );

        let limit_idx = launch
            .command
            .iter()
            .position(|a| a.starts_with(LIMIT_CONFIG_ARG))
            .unwrap();
        let field_idx = launch
            .command
            .iter()
            .position(|a| a.starts_with(FIELD_CONFIG_ARG))
            .unwrap();
        let pipe_idx = launch
            .command
            .iter()
            .position(|a| a.starts_with("--logPipe="))
            .unwrap();
        assert!(limit_idx < field_idx && field_idx < pipe_idx);

        assert_eq!(launch.artifacts.len(), 2);
        let started = controller.started.borrow();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0], launch.command);
    }

    #[test]
    fn model_debug_config_gets_its_own_artifact() {
        let mut job = job("j1");
        job.model_debug_config = Some(ModelDebugConfig::default());
        let fx = fixture(&job);
        let controller = RecordingController::new();

        let launch = LaunchBuilder::new(&job, &fx.env, &fx.settings, &controller, &fx.pipes)
            .build()
            .unwrap();

        let flags = flags_with_prefix(&launch.command, MODEL_DEBUG_CONFIG_ARG);
        assert_eq!(flags.len(), 1);
        assert_eq!(launch.artifacts.len(), 1);

        let path = flags[0].strip_prefix(MODEL_DEBUG_CONFIG_ARG).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("boundspercentile = 95"));
    }

    #[test]
    fn start_failure_carries_artifacts_for_cleanup() {
        let mut job = job("j1");
        job.analysis_limits = Some(limits());
        let fx = fixture(&job);

        let failure =
            LaunchBuilder::new(&job, &fx.env, &fx.settings, &TimingOutController, &fx.pipes)
                .build()
                .unwrap_err();

        assert!(matches!(
            failure.cause,
            LaunchError::Start(StartError::TimedOut { .. })
        ));
        assert_eq!(failure.artifacts.len(), 1);
    }
}
