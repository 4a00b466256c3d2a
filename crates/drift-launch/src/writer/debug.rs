use std::io::{self, Write};

use drift_model::ModelDebugConfig;

use crate::writer::DebugConfigWriter;

/// Writes the model debug section consumed by the worker's config parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniDebugConfigWriter;

impl DebugConfigWriter for IniDebugConfigWriter {
    fn write_debug_config(
        &self,
        config: &ModelDebugConfig,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(out, "boundspercentile = {}", config.bounds_percentile)?;
        if let Some(terms) = &config.terms {
            writeln!(out, "terms = {terms}")?;
        }
        Ok(())
    }
}
