//! Domain models for RefCo corpus documentation.
//!
//! This module contains the typed form of the documentation spreadsheet:
//!
//! - [`CriteriaModel`] - everything read from one documentation file
//! - [`Session`] - one recording session (CorpusComposition table)
//! - [`Tier`] - one annotation tier (AnnotationTiers table)
//! - [`Transcription`] - one documented grapheme (Transcription table)
//! - [`Gloss`] - one documented gloss abbreviation (Glosses table)
//! - [`Punctuation`] - one documented punctuation mark (Punctuations table)
//! - [`TierScope`] - the tiers a gloss or punctuation applies to

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Separator between several values in one cell: `,`, `;` or `:`
static VALUE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[,;:]\s*").expect("valid value separator regex"));

/// Tier functions of the RefCo vocabulary. Anything else is a custom function.
pub const TIER_FUNCTIONS: &[&str] = &[
    "transcription",
    "reference",
    "note",
    "part-of-speech",
    "morpheme gloss",
    "morpheme glossing",
    "morpheme segmentation",
    "free translation",
];

/// Punctuation function that marks a morpheme boundary in gloss tiers.
pub const MORPHEME_BREAK: &str = "morpheme break";

/// Punctuation function that joins a tier name and a speaker in tier ids.
pub const SPEAKER_CONVENTION: &str = "convention for associating a speaker to a tier";

/// Used when no punctuation documents the speaker convention.
pub const DEFAULT_TIER_SPEAKER_SEPARATOR: &str = "@";

/// Split a multi-value cell on `,`, `;` or `:`, dropping empty parts.
pub fn split_values(cell: &str) -> Vec<String> {
    VALUE_SEPARATOR
        .split(cell.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Overview
// =============================================================================

/// A documented value together with the notes justifying it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InformationNotes {
    pub information: String,
    pub notes: String,
}

impl InformationNotes {
    pub fn new(information: impl Into<String>, notes: impl Into<String>) -> Self {
        Self { information: information.into(), notes: notes.into() }
    }
}

// =============================================================================
// Table rows
// =============================================================================

/// One row of the CorpusComposition table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_name: String,
    /// One or more files, separated like other multi-value cells.
    pub file_names: String,
    pub speaker_names: String,
    pub speaker_ages: String,
    pub speaker_gender: String,
    pub recording_location: String,
    pub recording_date: String,
    pub genre: String,
}

impl Session {
    pub fn files(&self) -> Vec<String> {
        split_values(&self.file_names)
    }

    pub fn speakers(&self) -> Vec<String> {
        split_values(&self.speaker_names)
    }
}

/// One row of the AnnotationTiers table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub tier_name: String,
    /// Lower-cased tier functions.
    pub tier_functions: Vec<String>,
    pub segmentation_strategy: String,
    pub languages: String,
    /// Only meaningful for morpheme gloss tiers.
    pub morpheme_distinction: Option<String>,
}

impl Tier {
    /// True if one of the functions contains `function` (e.g. "morpheme gloss"
    /// also matches "morpheme glossing").
    pub fn has_function(&self, function: &str) -> bool {
        self.tier_functions.iter().any(|f| f.contains(function))
    }

    pub fn is_custom(&self) -> bool {
        !self
            .tier_functions
            .iter()
            .any(|f| TIER_FUNCTIONS.contains(&f.as_str()))
    }
}

/// One row of the Transcription table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    pub grapheme: String,
    pub linguistic_value: String,
    pub linguistic_convention: String,
}

/// Tiers a gloss or punctuation mark is valid in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierScope {
    All,
    Named(Vec<String>),
}

impl Default for TierScope {
    fn default() -> Self {
        TierScope::Named(Vec::new())
    }
}

impl TierScope {
    /// Parse a tiers cell: `all` in any case, otherwise a list of tier names
    /// or tier functions.
    pub fn parse(cell: &str) -> Self {
        if cell.trim().eq_ignore_ascii_case("all") {
            TierScope::All
        } else {
            TierScope::Named(split_values(cell))
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TierScope::Named(names) if names.is_empty())
    }

    /// Whether a tier id found in a document is covered.
    ///
    /// A named entry matches the id itself (case-insensitive), the id with a
    /// speaker suffix (`name@speaker`), or any documented function of the
    /// tier the id belongs to.
    pub fn covers(&self, tier_id: &str, functions: &[String], speaker_separator: &str) -> bool {
        match self {
            TierScope::All => true,
            TierScope::Named(names) => names.iter().any(|name| {
                tier_id.eq_ignore_ascii_case(name)
                    || tier_id.starts_with(&format!("{}{}", name, speaker_separator))
                    || functions.iter().any(|f| f.eq_ignore_ascii_case(name))
            }),
        }
    }
}

/// One row of the Glosses table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gloss {
    pub gloss: String,
    pub meaning: String,
    pub comments: String,
    pub tiers: TierScope,
}

/// One row of the Punctuations table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Punctuation {
    pub character: String,
    pub meaning: String,
    pub comments: String,
    pub tiers: TierScope,
    pub function: String,
}

// =============================================================================
// Criteria Model
// =============================================================================

/// Everything read from one RefCo documentation spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaModel {
    pub corpus_title: String,
    pub subject_languages: String,
    pub archive: String,
    pub persistent_id: String,
    pub annotation_license: String,
    pub recording_license: String,
    pub creator_name: String,
    pub creator_contact: String,
    pub creator_institution: String,
    pub refco_version: InformationNotes,
    pub number_sessions: InformationNotes,
    pub number_transcribed_words: InformationNotes,
    pub number_annotated_words: InformationNotes,
    pub translation_languages: InformationNotes,
    pub sessions: Vec<Session>,
    pub tiers: Vec<Tier>,
    pub transcriptions: Vec<Transcription>,
    pub glosses: Vec<Gloss>,
    pub punctuations: Vec<Punctuation>,
}

impl CriteriaModel {
    /// Characters splitting a gloss token into morphemes: `-`, `=` and every
    /// punctuation documented as a morpheme break.
    pub fn gloss_separators(&self) -> Vec<String> {
        let mut separators = vec!["-".to_string(), "=".to_string()];
        for p in &self.punctuations {
            if p.function.eq_ignore_ascii_case(MORPHEME_BREAK)
                && !p.character.is_empty()
                && !separators.contains(&p.character)
            {
                separators.push(p.character.clone());
            }
        }
        separators
    }

    /// Separator between tier name and speaker in tier ids such as `tx@SP1`.
    pub fn tier_speaker_separator(&self) -> String {
        self.punctuations
            .iter()
            .find(|p| p.function.eq_ignore_ascii_case(SPEAKER_CONVENTION) && !p.character.is_empty())
            .map(|p| p.character.clone())
            .unwrap_or_else(|| DEFAULT_TIER_SPEAKER_SEPARATOR.to_string())
    }

    /// Speakers of every session listing `file_name`.
    pub fn speakers_for_file(&self, file_name: &str) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|s| s.files().iter().any(|f| f == file_name))
            .flat_map(|s| s.speakers())
            .collect()
    }

    /// Documented tiers having a function that contains `function`.
    pub fn tiers_with_function<'a>(&'a self, function: &'a str) -> impl Iterator<Item = &'a Tier> + 'a {
        self.tiers.iter().filter(move |t| t.has_function(function))
    }

    /// The documented tier a document tier id refers to, directly or through
    /// the `name@speaker` convention.
    pub fn tier_for_id(&self, tier_id: &str) -> Option<&Tier> {
        let separator = self.tier_speaker_separator();
        self.tiers.iter().find(|t| t.tier_name == tier_id).or_else(|| {
            self.tiers
                .iter()
                .find(|t| tier_id.starts_with(&format!("{}{}", t.tier_name, separator)))
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
