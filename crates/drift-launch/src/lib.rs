mod builder;
pub use builder::{
    BuildFailure, FIELD_CONFIG_ARG, LIMIT_CONFIG_ARG, Launch, LaunchBuilder,
    MODEL_DEBUG_CONFIG_ARG,
};

mod command;
pub use command::{WORKER_BIN, build_worker_command};

mod controller;
pub use controller::{Controller, StartError};

mod env;
pub use env::{LaunchEnv, WorkerSettings};

mod error;
pub use error::LaunchError;

mod pipes;
pub use pipes::ProcessPipes;

mod scratch;
pub use scratch::{Artifacts, CONF_EXTENSION, create_conf_file};

mod state;
pub use state::{DELETE_STATE_FILES_ARG, QUANTILES_STATE_PATH_ARG, write_quantiles_state};

mod writer;
pub use writer::{
    ConfigWriters, DebugConfigWriter, FieldConfigWriter, IniDebugConfigWriter,
    IniFieldConfigWriter, IniLimitsWriter, LimitsWriter,
};
