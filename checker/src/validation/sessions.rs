//! CorpusComposition rules: session rows and the files they reference.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::Documentation;
use crate::corpus::normalize;
use crate::models::Session;
use crate::report::{ComplianceReport, Finding};

static SPEAKER_AGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^~?\d{1,3}$").expect("valid speaker age regex"));

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Folder a documented file is expected in, by extension.
fn folder_for(file: &str) -> &'static str {
    let lower = file.to_lowercase();
    if lower.ends_with("eaf") {
        "Annotations"
    } else if lower.ends_with("wav") || lower.ends_with("mp3") {
        "Recordings"
    } else {
        "Metadata"
    }
}

/// Where a documented file should be: inside the first existing folder among
/// `base/Folder`, `base/folder`, `base/../Folder` and `base/../folder`,
/// or directly in `base`. Absolute names are taken as they are.
pub fn resolve_file(base_dir: &Path, file: &str) -> PathBuf {
    if Path::new(file).is_absolute() {
        return PathBuf::from(file);
    }
    let folder = folder_for(file);
    let lower = folder.to_lowercase();
    let parent = base_dir.join("..");
    [base_dir.join(folder), base_dir.join(&lower), parent.join(folder), parent.join(&lower)]
        .into_iter()
        .find(|dir| dir.is_dir())
        .map(|dir| dir.join(file))
        .unwrap_or_else(|| base_dir.join(file))
}

fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string() == value)
        .unwrap_or(false)
}

/// Field rules of one row. `check_files` runs where the file names are
/// looked at, so findings keep the column order.
fn check_session<F>(report: &mut ComplianceReport, filename: &str, s: &Session, check_files: F)
where
    F: FnOnce(&mut ComplianceReport),
{
    if s.session_name.is_empty() {
        report.push(Finding::critical(filename, "Session name is empty").with_fix("Add session name"));
    }
    if s.file_names.is_empty() {
        report.push(
            Finding::critical(filename, format!("Session file names are empty: {}", s.session_name))
                .with_fix("Add all relevant file names for session"),
        );
    } else {
        check_files(report);
    }
    if s.speaker_names.is_empty() {
        report.push(Finding::critical(filename, "Corpus composition: Speaker name is empty").with_fix("Add speaker name"));
    }
    if s.speaker_ages.is_empty() {
        report.push(
            Finding::warning(filename, format!("Corpus composition: Speaker age is empty: {}", s.speaker_names))
                .with_fix("Add speaker age"),
        );
    } else if !SPEAKER_AGE.is_match(&s.speaker_ages) {
        report.push(
            Finding::warning(
                filename,
                format!("Corpus composition: Speaker age does not match schema: {}", s.speaker_ages),
            )
            .with_fix("Check and fix speaker age"),
        );
    }
    if s.speaker_gender.is_empty() {
        report.push(
            Finding::warning(filename, format!("Corpus composition: Speaker gender is empty: {}", s.speaker_names))
                .with_fix("Add speaker gender"),
        );
    }
    if s.recording_location.is_empty() {
        report.push(
            Finding::critical(filename, format!("Corpus composition: Recording location is empty: {}", s.speaker_names))
                .with_fix("Add recording location"),
        );
    }
    if s.recording_date.is_empty() {
        report.push(
            Finding::critical(filename, format!("Corpus composition: Recording date is empty: {}", s.speaker_names))
                .with_fix("Add recording date"),
        );
    } else if !is_valid_date(&s.recording_date) {
        report.push(
            Finding::warning(
                filename,
                format!(
                    "Corpus composition: Recording date in invalid format. Expected yyyy-mm-dd, got: {}",
                    s.recording_date
                ),
            )
            .with_fix("Check and fix recording date"),
        );
    }
    if s.genre.is_empty() {
        report.push(Finding::warning(filename, "Corpus composition: Genre is empty").with_fix("Add genre"));
    }
}

pub fn check_sessions(doc: &Documentation) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    let base_dir = doc.corpus.base_dir();
    let mut documented = BTreeSet::new();

    for session in &doc.criteria.sessions {
        check_session(&mut report, doc.filename, session, |report| {
            for file in session.files() {
                let path = resolve_file(base_dir, &file);
                if !path.exists() {
                    report.push(
                        Finding::critical(doc.filename, format!("Corpus composition: File does not exist: {}", file))
                            .with_fix("Check the file name or add the file to the corpus"),
                    );
                }
                documented.insert(normalize(&path));
            }
        });
    }

    let undocumented: Vec<String> = doc
        .corpus
        .session_files()
        .iter()
        .filter(|f| !documented.contains(*f))
        .map(|f| f.display().to_string())
        .collect();
    if !undocumented.is_empty() {
        report.push(
            Finding::warning(
                doc.filename,
                format!("Corpus composition: Files not documented in any session:\n{}", undocumented.join("\n")),
            )
            .with_fix("Add the files to a session or remove them from the corpus"),
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::elan::tests::eaf;
    use crate::corpus::Corpus;
    use crate::models::CriteriaModel;
    use crate::report::Severity;
    use std::fs;

    fn complete_session(files: &str) -> Session {
        Session {
            session_name: "s1".into(),
            file_names: files.into(),
            speaker_names: "SP1".into(),
            speaker_ages: "~50".into(),
            speaker_gender: "f".into(),
            recording_location: "Port Vila".into(),
            recording_date: "2020-01-31".into(),
            genre: "narrative".into(),
        }
    }

    fn run(criteria: &CriteriaModel, corpus: &Corpus) -> ComplianceReport {
        check_sessions(&Documentation { filename: "doc.fods", criteria, corpus })
    }

    #[test]
    fn test_dates() {
        assert!(is_valid_date("2020-01-31"));
        assert!(!is_valid_date("2020-1-31"));
        assert!(!is_valid_date("2020-02-30"));
        assert!(!is_valid_date("31.01.2020"));
    }

    #[test]
    fn test_field_rules() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = Corpus::from_documents(dir.path(), vec![]);
        let mut session = Session::default();
        session.speaker_ages = "fifty".into();
        session.recording_date = "2020/01/31".into();
        let criteria = CriteriaModel { sessions: vec![session], ..Default::default() };

        let report = run(&criteria, &corpus);
        let descriptions: Vec<_> = report.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "Session name is empty",
                "Session file names are empty: ",
                "Corpus composition: Speaker name is empty",
                "Corpus composition: Speaker age does not match schema: fifty",
                "Corpus composition: Speaker gender is empty: ",
                "Corpus composition: Recording location is empty: ",
                "Corpus composition: Recording date in invalid format. Expected yyyy-mm-dd, got: 2020/01/31",
                "Corpus composition: Genre is empty",
            ]
        );
        assert_eq!(report.count(Severity::Critical), 4);
    }

    #[test]
    fn test_files_in_sibling_folders() {
        let root = tempfile::tempdir().unwrap();
        let corpus_dir = root.path().join("corpus");
        fs::create_dir_all(&corpus_dir).unwrap();
        fs::create_dir_all(root.path().join("Annotations")).unwrap();
        fs::create_dir_all(root.path().join("recordings")).unwrap();
        fs::write(root.path().join("Annotations/s1.eaf"), eaf(&[("tx", &["a"])])).unwrap();
        fs::write(root.path().join("recordings/s1.wav"), b"RIFF").unwrap();
        fs::write(root.path().join("recordings/s2.wav"), b"RIFF").unwrap();

        assert_eq!(resolve_file(&corpus_dir, "s1.eaf"), corpus_dir.join("..").join("Annotations").join("s1.eaf"));
        assert_eq!(resolve_file(&corpus_dir, "notes.txt"), corpus_dir.join("notes.txt"));

        let (corpus, _) = Corpus::load(&corpus_dir).unwrap();
        let criteria = CriteriaModel {
            sessions: vec![complete_session("s1.eaf, s1.wav, s3.mp3")],
            ..Default::default()
        };
        let report = run(&criteria, &corpus);
        let descriptions: Vec<_> = report.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(descriptions.len(), 2, "{:?}", descriptions);
        assert_eq!(descriptions[0], "Corpus composition: File does not exist: s3.mp3");
        assert!(descriptions[1].starts_with("Corpus composition: Files not documented in any session:\n"));
        assert!(descriptions[1].ends_with("s2.wav"));
    }

    #[test]
    fn test_fully_documented_corpus() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s1.eaf"), eaf(&[("tx", &["a"])])).unwrap();
        fs::create_dir_all(dir.path().join("curation")).unwrap();
        fs::write(dir.path().join("curation/old.eaf"), "broken").unwrap();

        let (corpus, load_report) = Corpus::load(dir.path()).unwrap();
        assert!(load_report.is_empty());
        let criteria = CriteriaModel { sessions: vec![complete_session("s1.eaf")], ..Default::default() };
        assert!(run(&criteria, &corpus).is_empty());
    }
}
