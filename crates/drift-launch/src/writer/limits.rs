use std::io::{self, Write};

use drift_model::AnalysisLimits;

use crate::writer::LimitsWriter;

/// Writes the limit sections consumed by the worker's config parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniLimitsWriter;

impl LimitsWriter for IniLimitsWriter {
    fn write_limits(&self, limits: &AnalysisLimits, out: &mut dyn Write) -> io::Result<()> {
        if let Some(mb) = limits.model_memory_limit_mb {
            writeln!(out, "[memory]")?;
            writeln!(out, "modelmemorylimit = {mb}")?;
        }
        if let Some(n) = limits.categorization_examples_limit {
            writeln!(out, "[results]")?;
            writeln!(out, "categorizationexampleslimit = {n}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::IniLimitsWriter;
    use crate::writer::LimitsWriter;
    use drift_model::AnalysisLimits;

    fn render(limits: &AnalysisLimits) -> String {
        let mut out = Vec::new();
        IniLimitsWriter.write_limits(limits, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_limits_write_nothing() {
        assert_eq!(render(&AnalysisLimits::default()), "");
    }

    #[test]
    fn memory_limit_writes_memory_section() {
        let limits = AnalysisLimits {
            model_memory_limit_mb: Some(4096),
            categorization_examples_limit: None,
        };
        assert_eq!(render(&limits), "[memory]\nmodelmemorylimit = 4096\n");
    }

    #[test]
    fn both_sections_in_order() {
        let limits = AnalysisLimits {
            model_memory_limit_mb: Some(1024),
            categorization_examples_limit: Some(4),
        };
        assert_eq!(
            render(&limits),
            "[memory]\nmodelmemorylimit = 1024\n[results]\ncategorizationexampleslimit = 4\n"
        );
    }
}
