//! Access to the annotated corpus.
//!
//! Annotation documents are reached through the [`AnnotationDocument`]
//! trait. Which file formats are understood is decided by the static
//! [`DocumentKind`] registry; at the moment that is ELAN only.
//!
//! [`Corpus::load`] walks the corpus directory once, parses every supported
//! document and remembers the annotation and recording files it saw, so the
//! documentation checks can compare them to the sessions table.

pub mod elan;
pub mod text;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{CheckError, CheckResult, DocumentResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::CriteriaModel;
use crate::report::{ComplianceReport, Finding, Location};
pub use elan::ElanDocument;

/// Directories holding curation material, never part of the corpus.
pub const CURATION_DIR: &str = "curation";

/// Files with this in their name are the documentation itself.
pub const DOCUMENTATION_MARKER: &str = "CorpusDocumentation";

/// Extensions of the files sessions are expected to document.
const SESSION_FILE_EXTENSIONS: &[&str] = &["eaf", "wav", "mp3"];

/// Sibling directories of the corpus that may hold its files.
const SIBLING_DIRS: &[&str] = &["Annotations", "annotations", "Recordings", "recordings"];

// =============================================================================
// Document kinds
// =============================================================================

/// Supported annotation formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Elan,
}

const SUPPORTED_KINDS: &[DocumentKind] = &[DocumentKind::Elan];

pub fn supported_kinds() -> &'static [DocumentKind] {
    SUPPORTED_KINDS
}

impl DocumentKind {
    pub fn name(self) -> &'static str {
        match self {
            DocumentKind::Elan => "ELAN",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Elan => "eaf",
        }
    }

    /// The kind handling `path`, by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        supported_kinds().iter().copied().find(|k| k.extension() == ext)
    }

    pub fn open(self, path: &Path) -> DocumentResult<Box<dyn AnnotationDocument>> {
        match self {
            DocumentKind::Elan => Ok(Box::new(ElanDocument::from_path(path)?)),
        }
    }
}

/// What the checks need from an annotation document.
pub trait AnnotationDocument {
    /// Ids of all tiers, in document order, without duplicates.
    fn tier_ids(&self) -> Vec<String>;

    /// Non-empty annotation values of a tier.
    fn texts_in_tier(&self, tier_id: &str) -> Vec<String>;

    /// Where `token` occurs in the given tiers. With `detailed`, one location
    /// per matching annotation with segment id and time span, otherwise one
    /// per tier.
    fn locate(&self, tier_ids: &[String], token: &str, detailed: bool) -> Vec<Location>;
}

// =============================================================================
// Corpus
// =============================================================================

/// One parsed annotation document.
pub struct CorpusDocument {
    pub path: PathBuf,
    /// File name, used on findings
    pub name: String,
    document: Box<dyn AnnotationDocument>,
}

impl CorpusDocument {
    pub fn new(path: impl Into<PathBuf>, document: Box<dyn AnnotationDocument>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name, document }
    }

    pub fn document(&self) -> &dyn AnnotationDocument {
        self.document.as_ref()
    }
}

/// All documents and session-relevant files of a corpus.
pub struct Corpus {
    base_dir: PathBuf,
    documents: Vec<CorpusDocument>,
    files: BTreeSet<PathBuf>,
}

fn is_curation(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy() == CURATION_DIR
}

fn is_session_file(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
    !name.contains(DOCUMENTATION_MARKER) && SESSION_FILE_EXTENSIONS.contains(&ext.as_str())
}

/// Canonical form when the file exists, the path itself otherwise.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).into_iter().filter_entry(|e| !is_curation(e)) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.path().to_path_buf()),
            Ok(_) => {}
            Err(e) => log_warning(format!("Error accessing entry: {}", e)),
        }
    }
    files
}

impl Corpus {
    /// Walk `dir`, parse every supported document and collect session files.
    ///
    /// Documents that fail to parse become Critical findings; only a missing
    /// directory is an error.
    pub fn load(dir: &Path) -> CheckResult<(Self, ComplianceReport)> {
        if !dir.is_dir() {
            return Err(CheckError::CorpusNotFound(dir.to_path_buf()));
        }
        log_info(format!("Reading corpus from {}", dir.display()));

        let mut report = ComplianceReport::new();
        let mut documents = Vec::new();
        let mut files = BTreeSet::new();

        for path in walk_files(dir) {
            if is_session_file(&path) {
                files.insert(normalize(&path));
            }
            let Some(kind) = DocumentKind::from_path(&path) else {
                continue;
            };
            match kind.open(&path) {
                Ok(document) => documents.push(CorpusDocument::new(path, document)),
                Err(e) => {
                    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
                    log_warning(format!("Could not read {}: {}", path.display(), e));
                    report.push(
                        Finding::critical(name, format!("Corpus data: Unable to read {} document", kind.name()))
                            .with_fix("Check that the file is a valid annotation document")
                            .with_exception(&e),
                    );
                }
            }
        }

        if let Some(parent) = dir.parent() {
            for sibling in SIBLING_DIRS.iter().map(|d| parent.join(d)).filter(|d| d.is_dir()) {
                files.extend(walk_files(&sibling).iter().filter(|p| is_session_file(p)).map(|p| normalize(p)));
            }
        }

        log_success(format!("Read {} annotation documents", documents.len()));
        Ok((Self { base_dir: dir.to_path_buf(), documents, files }, report))
    }

    /// A corpus made of already parsed documents.
    pub fn from_documents(base_dir: impl Into<PathBuf>, documents: Vec<CorpusDocument>) -> Self {
        Self { base_dir: base_dir.into(), documents, files: BTreeSet::new() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn documents(&self) -> &[CorpusDocument] {
        &self.documents
    }

    /// Annotation and recording files found, normalized.
    pub fn session_files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    /// Every tier id with the documents it occurs in.
    pub fn tier_index(&self) -> TierIndex {
        let mut index = TierIndex::default();
        for doc in &self.documents {
            for id in doc.document().tier_ids() {
                index.insert(id, &doc.name);
            }
        }
        index
    }

    /// Whitespace separated tokens in all tiers documented with a function
    /// containing `function`.
    pub fn count_words(&self, criteria: &CriteriaModel, function: &str) -> usize {
        let mut count = 0;
        for doc in &self.documents {
            for id in doc.document().tier_ids() {
                if criteria.tier_for_id(&id).is_some_and(|t| t.has_function(function)) {
                    count += doc
                        .document()
                        .texts_in_tier(&id)
                        .iter()
                        .map(|t| t.split_whitespace().count())
                        .sum::<usize>();
                }
            }
        }
        count
    }
}

/// Tier ids present in the corpus, each with the files containing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierIndex {
    tiers: BTreeMap<String, BTreeSet<String>>,
}

impl TierIndex {
    pub fn insert(&mut self, tier_id: impl Into<String>, file: impl Into<String>) {
        self.tiers.entry(tier_id.into()).or_default().insert(file.into());
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.tiers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::elan::tests::eaf;
    use super::*;
    use crate::models::Tier;
    use crate::report::Severity;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_registry() {
        assert_eq!(supported_kinds(), &[DocumentKind::Elan]);
        assert_eq!(DocumentKind::from_path(Path::new("a/s1.EAF")), Some(DocumentKind::Elan));
        assert_eq!(DocumentKind::from_path(Path::new("s1.exb")), None);
    }

    #[test]
    fn test_load_walks_and_skips_curation() {
        let dir = tempdir().unwrap();
        let corpus_dir = dir.path().join("corpus");
        fs::create_dir_all(corpus_dir.join("curation")).unwrap();
        fs::create_dir_all(corpus_dir.join("sub")).unwrap();
        fs::write(corpus_dir.join("s1.eaf"), eaf(&[("tx@SP1", &["a"])])).unwrap();
        fs::write(corpus_dir.join("sub/s2.eaf"), eaf(&[("tx@SP2", &["b"])])).unwrap();
        fs::write(corpus_dir.join("curation/old.eaf"), eaf(&[("old", &["c"])])).unwrap();
        fs::write(corpus_dir.join("s1.wav"), b"RIFF").unwrap();
        fs::write(corpus_dir.join("notes.txt"), b"-").unwrap();

        let (corpus, report) = Corpus::load(&corpus_dir).unwrap();
        assert!(report.is_empty());
        assert_eq!(corpus.documents().len(), 2);
        assert_eq!(corpus.session_files().len(), 3);
        let index = corpus.tier_index();
        assert_eq!(index.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(), vec!["tx@SP1", "tx@SP2"]);
    }

    #[test]
    fn test_load_reports_broken_documents_and_continues() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.eaf"), "<ANNOTATION_DOCUMENT>").unwrap();
        fs::write(dir.path().join("good.eaf"), eaf(&[("tx", &["a"])])).unwrap();

        let (corpus, report) = Corpus::load(dir.path()).unwrap();
        assert_eq!(corpus.documents().len(), 1);
        assert_eq!(report.count(Severity::Critical), 1);
        assert_eq!(report.findings()[0].filename, "bad.eaf");
        assert!(report.findings()[0].exception.is_some());
    }

    #[test]
    fn test_sibling_directories_hold_session_files() {
        let dir = tempdir().unwrap();
        let corpus_dir = dir.path().join("Documentation");
        fs::create_dir_all(&corpus_dir).unwrap();
        fs::create_dir_all(dir.path().join("Recordings")).unwrap();
        fs::write(dir.path().join("Recordings/s1.wav"), b"RIFF").unwrap();
        fs::write(corpus_dir.join("CorpusDocumentation_x.eaf"), eaf(&[])).unwrap();

        let (corpus, _) = Corpus::load(&corpus_dir).unwrap();
        assert_eq!(corpus.session_files().len(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        assert!(matches!(Corpus::load(&dir.path().join("nope")), Err(CheckError::CorpusNotFound(_))));
    }

    #[test]
    fn test_tier_index_groups_files_and_counts_words() {
        let docs = vec![
            CorpusDocument::new("a.eaf", Box::new(ElanDocument::parse(&eaf(&[("tx@SP1", &["a b c"]), ("ft", &["x y"])])).unwrap())),
            CorpusDocument::new("b.eaf", Box::new(ElanDocument::parse(&eaf(&[("tx@SP1", &["d  e"])])).unwrap())),
        ];
        let corpus = Corpus::from_documents(".", docs);
        let index = corpus.tier_index();
        let files: Vec<_> = index.iter().map(|(id, files)| (id.as_str(), files.len())).collect();
        assert_eq!(files, vec![("ft", 1), ("tx@SP1", 2)]);

        let criteria = CriteriaModel {
            tiers: vec![Tier {
                tier_name: "tx".into(),
                tier_functions: vec!["transcription".into()],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(corpus.count_words(&criteria, "transcription"), 5);
        assert_eq!(corpus.count_words(&criteria, "morpheme gloss"), 0);
    }
}
