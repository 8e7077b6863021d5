//! Check pipeline: one documentation spreadsheet against one corpus.
//!
//! [`check_corpus`] combines all steps and always produces a report; only a
//! missing corpus directory is an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use refco::check::{check_corpus, CheckOptions};
//! use std::path::Path;
//!
//! let report = check_corpus(
//!     Path::new("corpus/CorpusDocumentation_nisv1234_Doe_Nisvai.ods"),
//!     Path::new("corpus"),
//!     &CheckOptions::default(),
//! )?;
//! println!("{} critical findings", report.summary().critical);
//! ```

pub mod options;

use std::path::Path;

use crate::corpus::text::{check_morphology, check_transcription, finalize, CorpusRunState};
use crate::corpus::Corpus;
use crate::error::{CheckResult, SpreadsheetError};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning, log_warning_indent};
use crate::parser::criteria::read_criteria;
use crate::parser::load_spreadsheet;
use crate::report::{ComplianceReport, Finding, Severity};
use crate::validation::{
    check_documentation, check_filename, Documentation, HttpOracle, IsoCodes, LanguageValidator, OfflineOracle,
    UrlOracle,
};
pub use options::CheckOptions;

/// Version recorded in the report header note.
pub const CHECKER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn spreadsheet_finding(filename: &str, error: &SpreadsheetError) -> Finding {
    match error {
        SpreadsheetError::UnsupportedFormat(_) => {
            Finding::critical(filename, "General: Spreadsheet is neither an ODS nor FODS file")
                .with_fix("Save the corpus documentation as .ods or .fods")
        }
        SpreadsheetError::MissingContent | SpreadsheetError::Archive(_) => {
            Finding::critical(filename, "General: ODS file invalid").with_fix("Check that the file is a valid ODS file")
        }
        SpreadsheetError::Xml(_) | SpreadsheetError::Io(_) => {
            Finding::critical(filename, "General: Unable to read corpus documentation")
                .with_fix("Check that the file is a readable OpenDocument spreadsheet")
        }
    }
    .with_exception(error)
}

fn load_iso_codes(filename: &str, options: &CheckOptions, report: &mut ComplianceReport) -> IsoCodes {
    let Some(path) = &options.iso_codes else {
        report.push(
            Finding::note(filename, "General: No ISO-639-3 table configured, three letter language codes are rejected")
                .with_fix("Pass the ISO-639-3 code table with --iso-codes or REFCO_ISO_CODES"),
        );
        return IsoCodes::default();
    };
    match IsoCodes::from_path(path) {
        Ok(codes) if codes.is_empty() => {
            log_warning(format!("ISO-639-3 table {} is empty", path.display()));
            report.push(Finding::warning(filename, "General: ISO-639-3 table is empty").with_fix("Check the ISO-639-3 table"));
            codes
        }
        Ok(codes) => {
            log_success(format!("Loaded {} ISO-639-3 codes", codes.len()));
            codes
        }
        Err(e) => {
            log_warning(format!("Could not load ISO-639-3 table {}: {}", path.display(), e));
            report.push(
                Finding::warning(filename, "General: Unable to load ISO-639-3 table")
                    .with_fix("Check the path of the ISO-639-3 table")
                    .with_exception(&e),
            );
            IsoCodes::default()
        }
    }
}

/// Check `spreadsheet` against the corpus in `corpus_dir`.
///
/// URL and Glottolog lookups go over HTTP unless `options.offline` is set.
pub fn check_corpus(spreadsheet: &Path, corpus_dir: &Path, options: &CheckOptions) -> CheckResult<ComplianceReport> {
    let oracle: Box<dyn UrlOracle> = if options.offline {
        log_info("Offline mode: URLs and Glottocodes are not looked up");
        Box::new(OfflineOracle)
    } else {
        Box::new(HttpOracle::new(options.http_timeout()))
    };
    check_corpus_with(spreadsheet, corpus_dir, options, oracle.as_ref())
}

/// Same as [`check_corpus`] with an explicit URL oracle.
pub fn check_corpus_with(
    spreadsheet: &Path,
    corpus_dir: &Path,
    options: &CheckOptions,
    oracle: &dyn UrlOracle,
) -> CheckResult<ComplianceReport> {
    let filename = spreadsheet
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| spreadsheet.display().to_string());
    let mut report = ComplianceReport::new();

    // Step 1: spreadsheet
    log_info(format!("Reading corpus documentation {}", spreadsheet.display()));
    let sheet = match load_spreadsheet(spreadsheet) {
        Ok(sheet) => sheet,
        Err(e) => {
            log_error(format!("Could not read {}: {}", spreadsheet.display(), e));
            report.push(spreadsheet_finding(&filename, &e));
            return Ok(report);
        }
    };
    log_success(format!("Read {} tables", sheet.tables.len()));

    let (criteria, read_report) = read_criteria(&sheet, &filename);
    report.push(Finding::note(
        &filename,
        format!(
            "Report created by RefCo checker version {} based on documentation following RefCo {} specification version",
            CHECKER_VERSION, criteria.refco_version.information
        ),
    ));
    report.merge(read_report);

    // Step 2: languages
    let iso = load_iso_codes(&filename, options, &mut report);
    let mut languages = LanguageValidator::new(iso, oracle);
    report.merge(check_filename(&filename, &mut languages));

    // Step 3: corpus
    let (corpus, corpus_report) = Corpus::load(corpus_dir)?;
    report.merge(corpus_report);

    // Step 4: documentation rules
    if options.skip_documentation_check {
        log_info("Skipping documentation check");
    } else {
        log_info("Checking documentation");
        let doc = Documentation { filename: &filename, criteria: &criteria, corpus: &corpus };
        report.merge(check_documentation(&doc, &mut languages));
    }

    // Step 5: corpus text
    let mut state = CorpusRunState::new(&criteria);
    let mode = options.location_mode();
    for doc in corpus.documents() {
        log_info_indent(format!("Checking {}", doc.name), 1);
        if !options.skip_transcription_check {
            let fragment = check_transcription(&criteria, doc, &mut state, mode);
            log_result(&fragment, "transcription");
            report.merge(fragment);
        }
        if !options.skip_gloss_check {
            let fragment = check_morphology(&criteria, doc, &mut state);
            log_result(&fragment, "glosses");
            report.merge(fragment);
        }
    }

    // Step 6: corpus-wide findings
    report.merge(finalize(&state, &filename, options.gloss_stats));

    let summary = report.summary();
    log_success(format!(
        "Done: {} critical, {} warnings, {} notes, {} correct",
        summary.critical, summary.warning, summary.note, summary.correct
    ));
    Ok(report)
}

fn log_result(fragment: &ComplianceReport, what: &str) {
    let problems = fragment.count(Severity::Critical) + fragment.count(Severity::Warning);
    if problems > 0 {
        log_warning_indent(format!("{}: {} problems", what, problems), 2);
    } else {
        log_info_indent(format!("{}: ok", what), 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::elan::tests::eaf;
    use crate::error::CheckError;
    use crate::logs::LOG_BROADCASTER;
    use crate::parser::criteria::tests::sample_documentation;
    use std::fs;
    use std::path::PathBuf;

    const SPREADSHEET: &str = "20240131_Test_RefCo-Report.fods";

    /// `root/corpus` with the spreadsheet and two ELAN files matching the
    /// sample documentation.
    fn corpus_fixture(number_sessions: &str) -> (tempfile::TempDir, PathBuf) {
        LOG_BROADCASTER.set_quiet(true);
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("corpus");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SPREADSHEET), sample_documentation(number_sessions)).unwrap();
        fs::write(dir.join("s1.eaf"), eaf(&[("tx@SP1", &["ab ba?"]), ("ge@SP1", &["3SG-PST 3SG"])])).unwrap();
        fs::write(dir.join("s2.eaf"), eaf(&[("tx@SP2", &["ts a"]), ("ge@SP2", &["PST PST"])])).unwrap();
        (root, dir)
    }

    fn run(dir: &Path, options: &CheckOptions) -> ComplianceReport {
        let oracle = |_: &str| true;
        check_corpus_with(&dir.join(SPREADSHEET), dir, options, &oracle).unwrap()
    }

    fn problems(report: &ComplianceReport) -> Vec<String> {
        report
            .iter()
            .filter(|f| matches!(f.severity, Severity::Critical | Severity::Warning))
            .map(|f| f.description.clone())
            .collect()
    }

    #[test]
    fn test_consistent_corpus_has_no_problems() {
        let (_root, dir) = corpus_fixture("2");
        let report = run(&dir, &CheckOptions::default());
        assert!(problems(&report).is_empty(), "{:?}", problems(&report));
        assert!(report.findings()[0].description.starts_with("Report created by RefCo checker version"));
        assert_eq!(report.count(Severity::Correct), 4);
    }

    #[test]
    fn test_session_count_mismatch_is_the_only_problem() {
        let (_root, dir) = corpus_fixture("3");
        let report = run(&dir, &CheckOptions::default());
        assert_eq!(
            problems(&report),
            vec!["Corpus composition: Number of sessions does not match number of sessions, expected 3 and found: 2"]
        );
    }

    #[test]
    fn test_skip_flags() {
        let (_root, dir) = corpus_fixture("3");
        let options = CheckOptions {
            skip_documentation_check: true,
            skip_transcription_check: true,
            skip_gloss_check: true,
            ..Default::default()
        };
        let report = run(&dir, &options);
        assert!(problems(&report).is_empty());
        assert_eq!(report.count(Severity::Correct), 0);
    }

    #[test]
    fn test_unsupported_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documentation.xlsx");
        fs::write(&path, "not a spreadsheet").unwrap();
        let oracle = |_: &str| true;
        let report = check_corpus_with(&path, dir.path(), &CheckOptions::default(), &oracle).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.findings()[0].description, "General: Spreadsheet is neither an ODS nor FODS file");
        assert!(report.findings()[0].exception.is_some());
    }

    #[test]
    fn test_ods_without_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20240131_Test_RefCo-Report.ods");
        let file = fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("mimetype", zip::write::SimpleFileOptions::default()).unwrap();
        zip.finish().unwrap();

        let oracle = |_: &str| true;
        let report = check_corpus_with(&path, dir.path(), &CheckOptions::default(), &oracle).unwrap();
        assert_eq!(report.findings()[0].description, "General: ODS file invalid");
        assert!(report.has_critical());
    }

    #[test]
    fn test_missing_corpus_directory_is_an_error() {
        let (root, dir) = corpus_fixture("2");
        let oracle = |_: &str| true;
        let result = check_corpus_with(&dir.join(SPREADSHEET), &root.path().join("missing"), &CheckOptions::default(), &oracle);
        assert!(matches!(result, Err(CheckError::CorpusNotFound(_))));
    }

    #[test]
    fn test_iso_table_problems_are_reported() {
        let (root, dir) = corpus_fixture("2");
        let options = CheckOptions { iso_codes: Some(root.path().join("missing.tab")), ..Default::default() };
        let report = run(&dir, &options);
        assert_eq!(problems(&report), vec!["General: Unable to load ISO-639-3 table"]);
    }
}
