//! # RefCo - corpus documentation compliance checker
//!
//! Checks a language documentation corpus against its RefCo documentation
//! spreadsheet: the spreadsheet is read into a typed model, its tables are
//! validated and cross-referenced with the ELAN files of the corpus, and the
//! annotation text is checked against the documented graphemes, punctuation
//! and glosses.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ ODS / FODS  │────▶│   Parser    │────▶│ Validation  │────▶│   Report    │
//! │ spreadsheet │     │ (criteria)  │     │ (tables)    │     │ (findings)  │
//! └─────────────┘     └─────────────┘     └──────▲──────┘     └──────▲──────┘
//!                                                │                   │
//!                     ┌─────────────┐     ┌──────┴──────┐            │
//!                     │ ELAN corpus │────▶│   Corpus    │────────────┘
//!                     │ (.eaf)      │     │ (text check)│
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use refco::{check_corpus, CheckOptions};
//! use std::path::Path;
//!
//! let report = check_corpus(Path::new("doc.ods"), Path::new("corpus"), &CheckOptions::default())?;
//! for finding in report.iter() {
//!     println!("{}", finding);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Progress log broadcaster
//! - [`models`] - Typed documentation criteria
//! - [`parser`] - Spreadsheet loading and table extraction
//! - [`segment`] - Dictionary segmentation of tokens
//! - [`validation`] - Documentation rules and language codes
//! - [`corpus`] - ELAN documents and corpus text checks
//! - [`report`] - Findings and the compliance report
//! - [`check`] - The complete check pipeline

// Core modules
pub mod error;
pub mod logs;
pub mod models;
pub mod report;

// Parsing
pub mod parser;
pub mod segment;

// Validation
pub mod validation;

// Corpus
pub mod corpus;

// Pipeline
pub mod check;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CheckError, CheckResult, DocumentError, DocumentResult, LanguageError, LanguageResult, SpreadsheetError,
    SpreadsheetResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CriteriaModel, Gloss, InformationNotes, Punctuation, Session, Tier, TierScope, Transcription};

// =============================================================================
// Re-exports - Report
// =============================================================================

pub use report::{ComplianceReport, Finding, Location, ReportSummary, Severity};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::criteria::read_criteria;
pub use parser::{load_spreadsheet, Sheet, SpreadsheetFormat};

// =============================================================================
// Re-exports - Segmentation
// =============================================================================

pub use segment::DictionarySegmenter;

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{HttpOracle, IsoCodes, LanguageValidator, OfflineOracle, UrlOracle};

// =============================================================================
// Re-exports - Corpus
// =============================================================================

pub use corpus::text::{CorpusRunState, LocationMode};
pub use corpus::{AnnotationDocument, Corpus, CorpusDocument, DocumentKind, ElanDocument, TierIndex};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use check::{check_corpus, check_corpus_with, CheckOptions, CHECKER_VERSION};
