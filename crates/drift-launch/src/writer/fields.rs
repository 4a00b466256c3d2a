use std::io::{self, Write};

use drift_model::{AnalysisConfig, Detector, LookupList};

use crate::writer::FieldConfigWriter;

/// Writes the field config section: detector clauses, categorization,
/// influencers, and the lookup lists the detectors reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniFieldConfigWriter;

impl FieldConfigWriter for IniFieldConfigWriter {
    fn write_field_config(
        &self,
        config: &AnalysisConfig,
        lists: &[LookupList],
        out: &mut dyn Write,
    ) -> io::Result<()> {
        for (i, detector) in config.detectors.iter().enumerate() {
            writeln!(out, "detector.{i}.clause = {}", clause(detector))?;
        }
        if let Some(field) = &config.categorization_field_name {
            writeln!(out, "categorizationfield = {field}")?;
        }
        for (i, influencer) in config.influencers.iter().enumerate() {
            writeln!(out, "influencer.{i} = {influencer}")?;
        }

        // Sorted by id so relaunching a job produces an identical file.
        let mut sorted: Vec<&LookupList> = lists.iter().collect();
        sorted.sort_by(|a, b| a.id().cmp(b.id()));
        for list in sorted {
            let items = serde_json::to_string(list.items()).map_err(io::Error::other)?;
            writeln!(out, "list.{} = {items}", list.id())?;
        }
        Ok(())
    }
}

/// Render a detector as the clause grammar the worker parses, e.g.
/// `mean(responsetime) by airline partitionfield=host`.
fn clause(detector: &Detector) -> String {
    let mut clause = match &detector.field_name {
        Some(field) => format!("{}({field})", detector.function),
        None => detector.function.clone(),
    };
    if let Some(by) = &detector.by_field_name {
        clause.push_str(&format!(" by {by}"));
    }
    if let Some(over) = &detector.over_field_name {
        clause.push_str(&format!(" over {over}"));
    }
    if let Some(partition) = &detector.partition_field_name {
        clause.push_str(&format!(" partitionfield={partition}"));
    }
    clause
}

#[cfg(test)]
mod tests {
    use super::IniFieldConfigWriter;
    use crate::writer::FieldConfigWriter;
    use drift_model::{AnalysisConfig, Detector, LookupList};

    fn render(config: &AnalysisConfig, lists: &[LookupList]) -> String {
        let mut out = Vec::new();
        IniFieldConfigWriter
            .write_field_config(config, lists, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bare_function_clause() {
        let config = AnalysisConfig {
            detectors: vec![Detector::new("count")],
            ..AnalysisConfig::default()
        };
        assert_eq!(render(&config, &[]), "detector.0.clause = count\n");
    }

    #[test]
    fn full_clause_grammar() {
        let detector = Detector {
            field_name: Some("responsetime".into()),
            by_field_name: Some("airline".into()),
            over_field_name: Some("client".into()),
            partition_field_name: Some("host".into()),
            ..Detector::new("mean")
        };
        let config = AnalysisConfig {
            detectors: vec![detector],
            ..AnalysisConfig::default()
        };
        assert_eq!(
            render(&config, &[]),
            "detector.0.clause = mean(responsetime) by airline over client partitionfield=host\n"
        );
    }

    #[test]
    fn influencers_and_categorization_follow_detectors() {
        let config = AnalysisConfig {
            categorization_field_name: Some("message".into()),
            detectors: vec![Detector::new("count"), Detector::new("rare")],
            influencers: vec!["client_ip".into()],
            ..AnalysisConfig::default()
        };
        assert_eq!(
            render(&config, &[]),
            "detector.0.clause = count\n\
             detector.1.clause = rare\n\
             categorizationfield = message\n\
             influencer.0 = client_ip\n"
        );
    }

    #[test]
    fn lists_are_json_encoded_and_sorted_by_id() {
        let config = AnalysisConfig {
            detectors: vec![Detector::new("count")],
            ..AnalysisConfig::default()
        };
        let lists = [
            LookupList::new("zz", ["z"]),
            LookupList::new("aa", ["a", "b"]),
        ];
        assert_eq!(
            render(&config, &lists),
            "detector.0.clause = count\n\
             list.aa = [\"a\",\"b\"]\n\
             list.zz = [\"z\"]\n"
        );
    }
}
