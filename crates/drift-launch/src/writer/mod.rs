//! Config-section writers.
//!
//! Each section of the worker's on-disk configuration is produced through
//! a one-method capability, so the launch builder depends only on the
//! write contract and tests can substitute recording or failing writers.

mod debug;
pub use debug::IniDebugConfigWriter;

mod fields;
pub use fields::IniFieldConfigWriter;

mod limits;
pub use limits::IniLimitsWriter;

use std::{
    fmt,
    io::{self, Write},
};

use drift_model::{AnalysisConfig, AnalysisLimits, LookupList, ModelDebugConfig};

/// Serializes the analysis limits section.
pub trait LimitsWriter {
    fn write_limits(&self, limits: &AnalysisLimits, out: &mut dyn Write) -> io::Result<()>;
}

/// Serializes the model debug section.
pub trait DebugConfigWriter {
    fn write_debug_config(&self, config: &ModelDebugConfig, out: &mut dyn Write)
    -> io::Result<()>;
}

/// Serializes the field config section, including the lookup lists it
/// references.
pub trait FieldConfigWriter {
    fn write_field_config(
        &self,
        config: &AnalysisConfig,
        lists: &[LookupList],
        out: &mut dyn Write,
    ) -> io::Result<()>;
}

/// The writer set used for one launch.
pub struct ConfigWriters {
    pub limits: Box<dyn LimitsWriter>,
    pub debug: Box<dyn DebugConfigWriter>,
    pub fields: Box<dyn FieldConfigWriter>,
}

impl Default for ConfigWriters {
    fn default() -> Self {
        Self {
            limits: Box::new(IniLimitsWriter),
            debug: Box::new(IniDebugConfigWriter),
            fields: Box::new(IniFieldConfigWriter),
        }
    }
}

impl fmt::Debug for ConfigWriters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigWriters")
            .field("limits", &"<writer>")
            .field("debug", &"<writer>")
            .field("fields", &"<writer>")
            .finish()
    }
}
