//! Rules over the documentation spreadsheet.
//!
//! Every check reads the [`CriteriaModel`] (and, where it cross-references,
//! the [`Corpus`]) and returns a [`ComplianceReport`] fragment. None of them
//! fail: anything wrong becomes a finding.
//!
//! - [`check_filename`] - naming schema of the spreadsheet file
//! - [`overview`] - Overview table, language codes, counts
//! - [`sessions`] - CorpusComposition table and referenced files
//! - [`tiers`] - AnnotationTiers table against the tiers in the corpus
//! - [`inventory`] - Transcription, Glosses and Punctuations tables
//! - [`language`] - language code acceptance

pub mod inventory;
pub mod language;
pub mod overview;
pub mod sessions;
pub mod tiers;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::corpus::Corpus;
use crate::models::CriteriaModel;
use crate::report::{ComplianceReport, Finding};
pub use language::{HttpOracle, IsoCodes, LanguageValidator, OfflineOracle, UrlOracle};

static REPORT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}_\w+_RefCo-Report\.f?ods$").expect("valid report name regex"));

static DOCUMENTATION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CorpusDocumentation_([\w\d]{8})_(\w+)_(\w+)\.f?ods$").expect("valid documentation name regex")
});

/// What the documentation checks look at.
pub struct Documentation<'a> {
    /// Short spreadsheet name used on findings
    pub filename: &'a str,
    pub criteria: &'a CriteriaModel,
    pub corpus: &'a Corpus,
}

/// Check the spreadsheet name against `YYYYMMDD_<name>_RefCo-Report.(f)ods`
/// or `CorpusDocumentation_<glottocode>_<creator>_<corpus>.(f)ods`.
pub fn check_filename(filename: &str, languages: &mut LanguageValidator) -> ComplianceReport {
    let mut report = ComplianceReport::new();

    if REPORT_NAME.is_match(filename) {
        let date = filename.get(..8).unwrap_or_default();
        if NaiveDate::parse_from_str(date, "%Y%m%d").is_err() {
            report.push(
                Finding::warning(filename, format!("General: Filename does not start with a valid date: {}", date))
                    .with_fix("Use the date of the report as YYYYMMDD"),
            );
        }
    } else if let Some(captures) = DOCUMENTATION_NAME.captures(filename) {
        let code = &captures[1];
        if !languages.is_valid(code) {
            report.push(
                Finding::warning(
                    filename,
                    format!("General: Language given in filename not valid Glottocode: {}", code),
                )
                .with_fix("Check that language is valid Glottocode"),
            );
        }
    } else {
        report.push(
            Finding::warning(
                filename,
                format!(
                    "General: Filename does not match schema YYYYMMDD_<Corpus-Name>_RefCo-Report.ods/.fods: {}",
                    filename
                ),
            )
            .with_fix("Rename documentation file"),
        );
    }

    report
}

/// Run every documentation rule, in table order.
pub fn check_documentation(doc: &Documentation, languages: &mut LanguageValidator) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    report.merge(overview::check_overview(doc, languages));
    report.merge(sessions::check_sessions(doc));
    report.merge(tiers::check_tiers(doc, languages));
    report.merge(inventory::check_transcriptions(doc));
    report.merge(inventory::check_glosses(doc));
    report.merge(inventory::check_punctuation(doc));
    report
}
