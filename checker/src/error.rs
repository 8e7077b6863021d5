//! Error types for the RefCo checker.
//!
//! Most problems found while checking a corpus are not errors at all: they
//! become [`crate::report::Finding`]s. The types here cover the failures that
//! stop a single step from producing data:
//!
//! - [`SpreadsheetError`] - reading the documentation spreadsheet
//! - [`DocumentError`] - reading an annotation document
//! - [`LanguageError`] - loading the ISO-639-3 code table
//! - [`CheckError`] - top-level errors of the check pipeline
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Spreadsheet Errors
// =============================================================================

/// Errors while loading the documentation spreadsheet.
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    /// Failed to read file.
    #[error("Failed to read spreadsheet: {0}")]
    Io(#[from] std::io::Error),

    /// The ODS archive could not be opened.
    #[error("Invalid ODS archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The ODS archive has no `content.xml` entry.
    #[error("ODS file invalid: missing content.xml")]
    MissingContent,

    /// Malformed XML.
    #[error("Invalid spreadsheet XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Neither `.ods` nor `.fods`.
    #[error("Spreadsheet is neither an ODS nor FODS file: {0}")]
    UnsupportedFormat(String),
}

// =============================================================================
// Annotation Document Errors
// =============================================================================

/// Errors while reading an annotation document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read file.
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML.
    #[error("Invalid document XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The root element is not the expected one.
    #[error("Unexpected root element '{found}', expected '{expected}'")]
    UnexpectedRoot { expected: String, found: String },
}

// =============================================================================
// Language Table Errors
// =============================================================================

/// Errors while loading the ISO-639-3 code table.
#[derive(Debug, Error)]
pub enum LanguageError {
    /// Failed to read file.
    #[error("Failed to read ISO-639-3 table: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed tab-separated data.
    #[error("Invalid ISO-639-3 table: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Check Errors (top-level)
// =============================================================================

/// Top-level errors of the check pipeline.
///
/// Returned by [`crate::check::check_corpus`] only for problems that make a
/// report impossible, such as a missing corpus directory.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Spreadsheet error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    /// Annotation document error.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Language table error.
    #[error("Language table error: {0}")]
    Language(#[from] LanguageError),

    /// Corpus directory does not exist.
    #[error("Corpus directory not found: {0}")]
    CorpusNotFound(PathBuf),

    /// Invalid options file.
    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for spreadsheet operations.
pub type SpreadsheetResult<T> = Result<T, SpreadsheetError>;

/// Result type for annotation document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for language table operations.
pub type LanguageResult<T> = Result<T, LanguageError>;

/// Result type for pipeline operations.
pub type CheckResult<T> = Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // SpreadsheetError -> CheckError
        let err: CheckError = SpreadsheetError::MissingContent.into();
        assert!(err.to_string().contains("content.xml"));

        // DocumentError -> CheckError
        let err: CheckError = DocumentError::UnexpectedRoot { expected: "ANNOTATION_DOCUMENT".into(), found: "html".into() }.into();
        assert!(err.to_string().contains("html"));
    }

    #[test]
    fn test_unexpected_root_format() {
        let err = DocumentError::UnexpectedRoot {
            expected: "ANNOTATION_DOCUMENT".into(),
            found: "html".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ANNOTATION_DOCUMENT"));
        assert!(msg.contains("html"));
    }
}
