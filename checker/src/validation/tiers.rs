//! AnnotationTiers rules and tier completeness.
//!
//! Every tier id found in the corpus has to be covered by the table, either
//! by its exact name or as `name@speaker` where the speaker is documented
//! for the session the file belongs to.

use super::language::LanguageValidator;
use super::Documentation;
use crate::corpus::TierIndex;
use crate::models::{split_values, CriteriaModel, Tier};
use crate::report::{ComplianceReport, Finding};

const MORPHEME_GLOSS: &str = "morpheme gloss";

/// Tier ids with the files they were found in that the table does not
/// account for.
pub fn undocumented_tiers(criteria: &CriteriaModel, found: &TierIndex) -> TierIndex {
    let separator = criteria.tier_speaker_separator();
    let mut remaining = TierIndex::default();

    for (id, files) in found.iter() {
        if criteria.tiers.iter().any(|t| &t.tier_name == id) {
            continue;
        }
        let mut files = files.clone();
        if id.contains(separator.as_str()) {
            files.retain(|file| {
                !criteria.tiers.iter().any(|tier| {
                    criteria.speakers_for_file(file).iter().any(|speaker| {
                        *id == format!("{}{}{}", tier.tier_name, separator, speaker)
                    })
                })
            });
        }
        for file in files {
            remaining.insert(id.as_str(), file);
        }
    }
    remaining
}

fn check_tier(report: &mut ComplianceReport, filename: &str, tier: &Tier, languages: &mut LanguageValidator) {
    if tier.tier_name.is_empty() {
        report.push(Finding::critical(filename, "Annotation Tiers: tier name is empty").with_fix("Add tier name"));
    }

    if tier.tier_functions.is_empty() {
        report.push(
            Finding::critical(filename, format!("Annotation Tiers: tier function is empty: {}", tier.tier_name))
                .with_fix("Add tier function"),
        );
    } else if tier.is_custom() {
        report.push(
            Finding::warning(
                filename,
                format!(
                    "Annotation Tiers: potential custom tier detected:\n{} with tier function {}",
                    tier.tier_name,
                    tier.tier_functions.join(", ")
                ),
            )
            .with_fix("Check if the tier function is correct"),
        );
    }

    if tier.segmentation_strategy.is_empty() {
        report.push(
            Finding::warning(
                filename,
                format!("Annotation Tiers: segmentation strategy is empty: {}", tier.tier_name),
            )
            .with_fix("Add segmentation strategy"),
        );
    }

    if tier.languages.is_empty() {
        report.push(
            Finding::critical(filename, format!("Annotation Tiers: tier languages is empty: {}", tier.tier_name))
                .with_fix("Add tier languages"),
        );
    } else {
        for lang in split_values(&tier.languages) {
            if !languages.is_valid(&lang) {
                report.push(
                    Finding::warning(
                        filename,
                        format!(
                            "Annotation Tiers: language is neither a Glottolog, a ISO-639-3 language code nor otherwise known:\n{}",
                            lang
                        ),
                    )
                    .with_fix("Use a valid language code"),
                );
            }
        }
    }

    if tier.has_function(MORPHEME_GLOSS) && tier.morpheme_distinction.as_deref().map_or(true, str::is_empty) {
        report.push(
            Finding::warning(
                filename,
                format!("Annotation Tiers: morpheme distinction is empty: {}", tier.tier_name),
            )
            .with_fix("Document how affixes and clitics are distinguished in the morpheme gloss tier"),
        );
    }
}

pub fn check_tiers(doc: &Documentation, languages: &mut LanguageValidator) -> ComplianceReport {
    let mut report = ComplianceReport::new();

    let missing = undocumented_tiers(doc.criteria, &doc.corpus.tier_index());
    if !missing.is_empty() {
        let listing: Vec<String> = missing
            .iter()
            .map(|(id, files)| format!("{}: {}", id, files.iter().cloned().collect::<Vec<_>>().join(",")))
            .collect();
        report.push(
            Finding::warning(doc.filename, format!("Tiers are not documented:\n{}", listing.join(",\n")))
                .with_fix("Add documentation for all tiers"),
        );
    }

    for tier in &doc.criteria.tiers {
        check_tier(&mut report, doc.filename, tier, languages);
    }

    report
}
