//! Transcription, Glosses and Punctuations tables.

use super::Documentation;
use crate::models::{CriteriaModel, TierScope};
use crate::report::{ComplianceReport, Finding};

/// True if `name` is a documented tier name (case-insensitive) or one of the
/// documented tier functions.
fn is_documented_tier(criteria: &CriteriaModel, name: &str) -> bool {
    let lower = name.to_lowercase();
    criteria
        .tiers
        .iter()
        .any(|t| t.tier_name.eq_ignore_ascii_case(name) || t.tier_functions.contains(&lower))
}

/// Tier names of a scope cell that the AnnotationTiers table does not know.
fn undefined_tiers<'a>(criteria: &CriteriaModel, scope: &'a TierScope) -> Vec<&'a str> {
    match scope {
        TierScope::All => Vec::new(),
        TierScope::Named(names) => names
            .iter()
            .map(String::as_str)
            .filter(|n| !is_documented_tier(criteria, n))
            .collect(),
    }
}

pub fn check_transcriptions(doc: &Documentation) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    for t in &doc.criteria.transcriptions {
        if t.grapheme.is_empty() {
            report.push(Finding::critical(doc.filename, "Transcription: Grapheme is empty").with_fix("Add grapheme"));
        }
        if t.linguistic_value.is_empty() {
            report.push(
                Finding::critical(
                    doc.filename,
                    format!("Transcription: Grapheme linguistic value is empty: {}", t.grapheme),
                )
                .with_fix("Add linguistic value"),
            );
        }
        if t.linguistic_convention.is_empty() {
            report.push(
                Finding::warning(
                    doc.filename,
                    format!("Transcription: Grapheme linguistic convention is empty: {}", t.grapheme),
                )
                .with_fix("Add linguistic convention"),
            );
        }
    }
    report
}

pub fn check_glosses(doc: &Documentation) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    let separators = doc.criteria.gloss_separators();

    for g in &doc.criteria.glosses {
        if g.gloss.is_empty() {
            report.push(Finding::critical(doc.filename, "Glosses: Gloss is empty").with_fix("Add gloss abbreviations"));
        } else if separators.iter().any(|s| g.gloss.contains(s.as_str()))
            && !g.gloss.chars().any(|c| c.is_ascii_lowercase())
        {
            // Only grammatical glosses (no lower case) are split in the corpus
            report.push(
                Finding::warning(
                    doc.filename,
                    format!(
                        "Glosses: Gloss contains separating character:\n{} contains one of [{}]",
                        g.gloss,
                        separators.join(", ")
                    ),
                )
                .with_fix("Document the gloss parts separately"),
            );
        }
        if g.meaning.is_empty() {
            report.push(
                Finding::critical(doc.filename, format!("Glosses: Gloss meaning is empty: {}", g.gloss))
                    .with_fix("Add a gloss definition to the corpus documentation"),
            );
        }
        if g.tiers.is_empty() {
            report.push(
                Finding::critical(doc.filename, format!("Corpus data: Gloss tiers are empty: {}", g.gloss))
                    .with_fix("Check that all gloss tiers are documented as such"),
            );
        }
        for t in undefined_tiers(doc.criteria, &g.tiers) {
            report.push(
                Finding::critical(doc.filename, format!("Glosses: Gloss tier not defined in Annotation Tiers: {}", t))
                    .with_fix("Add documentation for tier"),
            );
        }
    }
    report
}

pub fn check_punctuation(doc: &Documentation) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    for p in &doc.criteria.punctuations {
        if p.character.is_empty() {
            report.push(
                Finding::critical(doc.filename, "Punctuation: Grapheme is empty").with_fix("Add punctuation grapheme"),
            );
        }
        if p.meaning.is_empty() {
            report.push(
                Finding::critical(doc.filename, format!("Punctuation: meaning is empty for grapheme: {}", p.character))
                    .with_fix("Add grapheme meaning"),
            );
        }
        if p.tiers.is_empty() {
            report.push(
                Finding::critical(doc.filename, format!("Punctuation: tiers is empty for grapheme: {}", p.character))
                    .with_fix("Add valid tiers for punctuation"),
            );
        }
        for t in undefined_tiers(doc.criteria, &p.tiers) {
            report.push(
                Finding::critical(doc.filename, format!("Punctuation: tier not defined in Annotation Tiers: {}", t))
                    .with_fix("Add documentation for tier"),
            );
        }
        if p.function.is_empty() {
            report.push(
                Finding::critical(doc.filename, format!("Punctuation: function is empty for grapheme: {}", p.character))
                    .with_fix("Add valid function for punctuation"),
            );
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::models::{Gloss, Punctuation, Tier, Transcription};
    use crate::report::Severity;

    fn criteria() -> CriteriaModel {
        CriteriaModel {
            tiers: vec![Tier {
                tier_name: "ge".into(),
                tier_functions: vec!["morpheme gloss".into()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn descriptions(report: &ComplianceReport) -> Vec<&str> {
        report.iter().map(|f| f.description.as_str()).collect()
    }

    #[test]
    fn test_transcriptions() {
        let corpus = Corpus::from_documents(".", vec![]);
        let mut criteria = criteria();
        criteria.transcriptions = vec![
            Transcription { grapheme: "a".into(), linguistic_value: "a".into(), linguistic_convention: "IPA".into() },
            Transcription { grapheme: "ts".into(), ..Default::default() },
        ];
        let report = check_transcriptions(&Documentation { filename: "doc.fods", criteria: &criteria, corpus: &corpus });
        assert_eq!(
            descriptions(&report),
            vec![
                "Transcription: Grapheme linguistic value is empty: ts",
                "Transcription: Grapheme linguistic convention is empty: ts",
            ]
        );
        assert_eq!(report.count(Severity::Critical), 1);
    }

    #[test]
    fn test_glosses() {
        let corpus = Corpus::from_documents(".", vec![]);
        let mut criteria = criteria();
        criteria.glosses = vec![
            Gloss { gloss: "3SG".into(), meaning: "third singular".into(), tiers: TierScope::All, ..Default::default() },
            Gloss {
                gloss: "PST".into(),
                meaning: "past".into(),
                tiers: TierScope::parse("GE, morpheme gloss"),
                ..Default::default()
            },
            Gloss { gloss: "1-PL".into(), meaning: "first plural".into(), tiers: TierScope::parse("mb"), ..Default::default() },
            Gloss { gloss: "go-back".into(), meaning: "return".into(), tiers: TierScope::All, ..Default::default() },
            Gloss::default(),
        ];
        let report = check_glosses(&Documentation { filename: "doc.fods", criteria: &criteria, corpus: &corpus });
        assert_eq!(
            descriptions(&report),
            vec![
                "Glosses: Gloss contains separating character:\n1-PL contains one of [-, =]",
                "Glosses: Gloss tier not defined in Annotation Tiers: mb",
                "Glosses: Gloss is empty",
                "Glosses: Gloss meaning is empty: ",
                "Corpus data: Gloss tiers are empty: ",
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        let corpus = Corpus::from_documents(".", vec![]);
        let mut criteria = criteria();
        criteria.punctuations = vec![
            Punctuation {
                character: "-".into(),
                meaning: "morpheme break".into(),
                tiers: TierScope::parse("ge"),
                function: "morpheme break".into(),
                ..Default::default()
            },
            Punctuation { character: "?".into(), tiers: TierScope::parse("ft"), ..Default::default() },
        ];
        let report = check_punctuation(&Documentation { filename: "doc.fods", criteria: &criteria, corpus: &corpus });
        assert_eq!(
            descriptions(&report),
            vec![
                "Punctuation: meaning is empty for grapheme: ?",
                "Punctuation: tier not defined in Annotation Tiers: ft",
                "Punctuation: function is empty for grapheme: ?",
            ]
        );
        assert!(report.iter().all(|f| f.severity == Severity::Critical));
    }
}
