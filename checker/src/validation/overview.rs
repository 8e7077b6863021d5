//! Overview table rules.

use super::language::LanguageValidator;
use super::Documentation;
use crate::corpus::text::{MORPHOLOGY_FUNCTION, TRANSCRIPTION_FUNCTION};
use crate::models::split_values;
use crate::report::{ComplianceReport, Finding};

/// True when a counted value is outside 80..=120 percent of the documented
/// one, or either is zero.
pub fn count_is_off(documented: u64, counted: u64) -> bool {
    documented == 0 || counted == 0 || counted * 10 < documented * 8 || counted * 10 > documented * 12
}

fn require(report: &mut ComplianceReport, filename: &str, value: &str, critical: bool, what: &str, fix: &str) -> bool {
    if !value.is_empty() {
        return true;
    }
    let description = format!("Overview: {} is empty", what);
    let finding = if critical {
        Finding::critical(filename, description)
    } else {
        Finding::warning(filename, description)
    };
    report.push(finding.with_fix(fix));
    false
}

fn check_languages(report: &mut ComplianceReport, filename: &str, cell: &str, languages: &mut LanguageValidator) {
    for lang in split_values(cell) {
        if !languages.is_valid(&lang) {
            report.push(
                Finding::warning(
                    filename,
                    format!(
                        "Overview: Language is neither a Glottolog, a ISO-639-3 language code nor otherwise known: {}",
                        lang
                    ),
                )
                .with_fix("Use a valid language code"),
            );
        }
    }
}

fn parse_number(report: &mut ComplianceReport, filename: &str, value: &str, what: &str, fix: &str) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            report.push(Finding::warning(filename, format!("Overview: {} is not a number", what)).with_fix(fix));
            None
        }
    }
}

pub fn check_overview(doc: &Documentation, languages: &mut LanguageValidator) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    let filename = doc.filename;
    let c = doc.criteria;
    let r = &mut report;

    require(r, filename, &c.corpus_title, true, "Corpus title", "Add a corpus title");
    if require(r, filename, &c.subject_languages, true, "Subject languages", "Add a subject language") {
        check_languages(r, filename, &c.subject_languages, languages);
    }
    require(r, filename, &c.archive, false, "Archive name", "Add an archive name");

    if require(r, filename, &c.persistent_id, true, "Persistent identifier", "Add a persistent identifier")
        && !languages.oracle().exists(&c.persistent_id)
    {
        let description = "Overview: Persistent identifier not a valid or working URL";
        let fix = "Use a valid URL as the persistent identifier and check that it works properly, i.e. refers to an accessible resource";
        r.push(if languages.oracle().is_online() {
            Finding::critical(filename, description).with_fix(fix)
        } else {
            Finding::note(filename, format!("{} (not checked, offline)", description)).with_fix(fix)
        });
    }

    require(r, filename, &c.annotation_license, true, "Annotation license", "Add annotation license");
    require(r, filename, &c.recording_license, false, "Recording license", "Add recording license");
    require(r, filename, &c.creator_name, true, "Creator name", "Add creator name");
    require(r, filename, &c.creator_contact, true, "Creator contact", "Add creator contact");
    require(r, filename, &c.creator_institution, false, "Creator institution", "Add creator institution");

    if require(r, filename, &c.refco_version.information, true, "RefCo version", "Add RefCo version") {
        parse_number(r, filename, &c.refco_version.information, "Refco version", "Check the RefCo version number");
    }

    if require(r, filename, &c.number_sessions.information, false, "Number of sessions", "Add number of sessions") {
        if let Some(expected) =
            parse_number(r, filename, &c.number_sessions.information, "Number of sessions", "Check the number of sessions")
        {
            if expected != c.sessions.len() as u64 {
                r.push(
                    Finding::warning(
                        filename,
                        format!(
                            "Corpus composition: Number of sessions does not match number of sessions, expected {} and found: {}",
                            expected,
                            c.sessions.len()
                        ),
                    )
                    .with_fix("Compare the number given in Overview to the number of sessions in Corpus composition"),
                );
            }
        }
    }

    if require(
        r,
        filename,
        &c.number_transcribed_words.information,
        false,
        "Number of transcribed words",
        "Add number of transcribed words count",
    ) {
        if let Some(expected) = parse_number(
            r,
            filename,
            &c.number_transcribed_words.information,
            "Number of transcribed words",
            "Check the word count and make sure it is given as a proper number",
        ) {
            let counted = doc.corpus.count_words(c, TRANSCRIPTION_FUNCTION) as u64;
            if count_is_off(expected, counted) {
                r.push(
                    Finding::warning(
                        filename,
                        format!(
                            "Overview: Transcription word count is either 0 or more than 20 percent off. Counted {} expected {}",
                            counted, expected
                        ),
                    )
                    .with_fix("Correct the word count"),
                );
            }
        }
    }

    if require(
        r,
        filename,
        &c.number_annotated_words.information,
        false,
        "Number of annotated words",
        "Add the number of annotated words",
    ) {
        if let Some(expected) = parse_number(
            r,
            filename,
            &c.number_annotated_words.information,
            "Number of annotated words",
            "Check and fix the number of annotated words",
        ) {
            let counted = doc.corpus.count_words(c, MORPHOLOGY_FUNCTION) as u64;
            if count_is_off(expected, counted) {
                r.push(
                    Finding::warning(
                        filename,
                        format!(
                            "Overview: Annotation word count is either 0 or more than 20 percent off. Counted {} expected {}",
                            counted, expected
                        ),
                    )
                    .with_fix("Correct the word count"),
                );
            }
        }
    }

    if require(
        r,
        filename,
        &c.translation_languages.information,
        false,
        "Translation languages",
        "Add translation languages",
    ) {
        check_languages(r, filename, &c.translation_languages.information, languages);
    }

    report
}
