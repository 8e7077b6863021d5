//! Checks of the annotated text against the documented inventory.
//!
//! A run goes through three phases:
//!
//! 1. [`CorpusRunState::new`] seeds the morpheme frequencies with every
//!    documented gloss at zero.
//! 2. For every document, [`check_transcription`] scores the transcription
//!    tiers against graphemes and punctuation, and [`check_morphology`]
//!    scores the gloss tiers against the documented glosses. Both update the
//!    run state.
//! 3. [`finalize`] reports documented glosses that never occurred and
//!    summarizes undocumented ones.
//!
//! Scores are integer ratios: a document passes when
//! `matched * 100 >= threshold * (matched + missing)`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::CorpusDocument;
use crate::models::{CriteriaModel, TierScope};
use crate::report::{ComplianceReport, Finding, Location};
use crate::segment::DictionarySegmenter;

/// Minimum share of valid transcription characters, in percent.
pub const TRANSCRIPTION_THRESHOLD: usize = 99;

/// Minimum share of valid gloss morphemes, in percent.
pub const MORPHOLOGY_THRESHOLD: usize = 70;

pub const TRANSCRIPTION_FUNCTION: &str = "transcription";
pub const MORPHOLOGY_FUNCTION: &str = "morpheme gloss";

/// Tier name always checked as transcription, documented or not.
pub const DEFAULT_TRANSCRIPTION_TIER: &str = "transcription";

/// Shape of a gloss abbreviation.
static GLOSS_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Z]+$").expect("valid gloss shape regex"));

// =============================================================================
// Run state
// =============================================================================

/// Occurrence counts keyed by string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyList {
    counts: BTreeMap<String, usize>,
}

impl FrequencyList {
    /// Count one occurrence.
    pub fn put(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Make `key` known without counting it.
    pub fn seed(&mut self, key: &str) {
        self.counts.entry(key.to_string()).or_insert(0);
    }

    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries by descending count, ties by key.
    pub fn by_count(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Frequencies shared by all documents of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusRunState {
    pub morpheme_freq: FrequencyList,
    pub gloss_freq: FrequencyList,
    pub token_freq: FrequencyList,
    pub missing_gloss_freq: FrequencyList,
}

impl CorpusRunState {
    pub fn new(criteria: &CriteriaModel) -> Self {
        let mut state = Self::default();
        for gloss in criteria.glosses.iter().filter(|g| !g.gloss.is_empty()) {
            state.morpheme_freq.seed(&gloss.gloss);
        }
        state
    }
}

/// How invalid tokens are located in their document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationMode {
    /// No lookup, one finding per token
    Skip,
    /// Tier only
    #[default]
    Tiers,
    /// Tier, annotation and time span
    Detailed,
}

// =============================================================================
// Tier resolution
// =============================================================================

/// Documented tiers with a function containing `function` that occur in
/// `doc`, either by name or as `name{separator}speaker` for a speaker
/// documented for the file.
pub fn tiers_by_function(criteria: &CriteriaModel, doc: &CorpusDocument, function: &str) -> Vec<String> {
    let present: BTreeSet<String> = doc.document().tier_ids().into_iter().collect();
    let speakers = criteria.speakers_for_file(&doc.name);
    let separator = criteria.tier_speaker_separator();

    let mut found = Vec::new();
    for tier in criteria.tiers_with_function(function) {
        let candidates = std::iter::once(tier.tier_name.clone())
            .chain(speakers.iter().map(|s| format!("{}{}{}", tier.tier_name, separator, s)));
        for id in candidates {
            if present.contains(&id) && !found.contains(&id) {
                found.push(id);
            }
        }
    }
    found
}

/// Tiers checked for transcription characters.
pub fn transcription_tiers(criteria: &CriteriaModel, doc: &CorpusDocument) -> Vec<String> {
    let mut tiers = tiers_by_function(criteria, doc, TRANSCRIPTION_FUNCTION);
    let default = DEFAULT_TRANSCRIPTION_TIER.to_string();
    if !tiers.contains(&default) {
        tiers.push(default);
    }
    tiers
}

/// Tiers checked for gloss morphemes.
pub fn gloss_tiers(criteria: &CriteriaModel, doc: &CorpusDocument) -> Vec<String> {
    tiers_by_function(criteria, doc, MORPHOLOGY_FUNCTION)
}

fn scope_covers_any(criteria: &CriteriaModel, scope: &TierScope, tiers: &[String]) -> bool {
    let separator = criteria.tier_speaker_separator();
    tiers.iter().any(|id| {
        let functions = criteria.tier_for_id(id).map(|t| t.tier_functions.as_slice()).unwrap_or(&[]);
        scope.covers(id, functions, &separator)
    })
}

/// Documented glosses valid in at least one of `tiers`.
pub fn glosses_for(criteria: &CriteriaModel, tiers: &[String]) -> BTreeSet<String> {
    criteria
        .glosses
        .iter()
        .filter(|g| !g.gloss.is_empty() && scope_covers_any(criteria, &g.tiers, tiers))
        .map(|g| g.gloss.clone())
        .collect()
}

/// Graphemes plus punctuation valid in at least one of `tiers`.
pub fn chunks_for(criteria: &CriteriaModel, tiers: &[String]) -> BTreeSet<String> {
    let graphemes = criteria.transcriptions.iter().map(|t| t.grapheme.clone());
    let punctuation = criteria
        .punctuations
        .iter()
        .filter(|p| scope_covers_any(criteria, &p.tiers, tiers))
        .map(|p| p.character.clone());
    graphemes.chain(punctuation).filter(|c| !c.is_empty()).collect()
}

fn texts(doc: &CorpusDocument, tiers: &[String]) -> Vec<String> {
    tiers.iter().flat_map(|t| doc.document().texts_in_tier(t)).collect()
}

fn percentage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (matched as f64 / total as f64 * 1000.0).round() / 10.0
}

// =============================================================================
// Transcription
// =============================================================================

pub fn check_transcription(
    criteria: &CriteriaModel,
    doc: &CorpusDocument,
    state: &mut CorpusRunState,
    mode: LocationMode,
) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    let filename = doc.name.as_str();

    let tiers = transcription_tiers(criteria, doc);
    if tiers.is_empty() {
        report.push(
            Finding::critical(filename, "Corpus data: No transcription tiers found")
                .with_fix("Check that all transcription tiers are documented"),
        );
        return report;
    }

    let chunks = chunks_for(criteria, &tiers);
    if chunks.is_empty() {
        report.push(
            Finding::critical(
                filename,
                "Transcription/Punctuation: No valid transcription characters (graphemes/punctuation) defined",
            )
            .with_fix("Define all graphemes and punctuation characters used in the corpus"),
        );
        return report;
    }

    let text = texts(doc, &tiers);
    let tokens: Vec<&str> = text.iter().flat_map(|t| t.split_whitespace()).collect();
    if tokens.is_empty() {
        report.push(
            Finding::critical(
                filename,
                format!("Corpus data: No transcribed text found in tiers: {}", tiers.join(", ")),
            )
            .with_fix("Check that all documented transcription tiers exist in the corpus"),
        );
        return report;
    }

    let glosses = glosses_for(criteria, &tiers);
    let segmenter = DictionarySegmenter::new(&chunks);

    let mut matched = 0;
    let mut missing = 0;
    let mut reported = BTreeSet::new();
    for token in tokens {
        state.token_freq.put(token);
        let length = token.chars().count();
        if glosses.contains(token) || segmenter.can_segment(token) {
            matched += length;
            continue;
        }
        missing += length;
        if !reported.insert(token) {
            continue;
        }

        let description = format!(
            "Corpus data: Transcription token contains invalid character(s):\n{} containing: [{}]",
            token,
            segmenter.residue(token)
        );
        let warning = Finding::warning(filename, description)
            .with_fix("Add all transcription characters to the documentation");
        if mode == LocationMode::Skip {
            report.push(warning);
            continue;
        }
        let mut locations = doc.document().locate(&tiers, token, mode == LocationMode::Detailed);
        if locations.is_empty() {
            locations.push(Location::unknown());
        }
        for location in locations {
            report.push(warning.clone().with_location(location));
        }
    }

    let total = matched + missing;
    let percent = percentage(matched, total);
    if matched * 100 < TRANSCRIPTION_THRESHOLD * total {
        report.push(
            Finding::critical(
                filename,
                format!(
                    "Corpus data: Less than {} percent of transcription characters are valid.\nValid: {} Invalid: {} Percentage: {:.1}",
                    TRANSCRIPTION_THRESHOLD, matched, missing, percent
                ),
            )
            .with_fix("Add documentation for all graphemes and punctuation marks used in transcription"),
        );
    } else if missing == 0 {
        report.push(
            Finding::correct(filename, "Corpus data: All characters are valid")
                .with_fix("Documentation cannot be improved"),
        );
    } else {
        report.push(
            Finding::correct(
                filename,
                format!(
                    "Corpus data: More than {} percent of transcription characters are valid.\nValid: {} Invalid: {} Percentage: {:.1}",
                    TRANSCRIPTION_THRESHOLD, matched, missing, percent
                ),
            )
            .with_fix("Documentation can be improved but no fix necessary"),
        );
    }
    report
}

// =============================================================================
// Morphology
// =============================================================================

pub fn check_morphology(criteria: &CriteriaModel, doc: &CorpusDocument, state: &mut CorpusRunState) -> ComplianceReport {
    let mut report = ComplianceReport::new();
    let filename = doc.name.as_str();

    let tiers = gloss_tiers(criteria, doc);
    if tiers.is_empty() {
        report.push(
            Finding::critical(filename, "Corpus composition: No morphology tiers found")
                .with_fix("Add documentation for tiers of type morphology gloss"),
        );
        return report;
    }

    let glosses = glosses_for(criteria, &tiers);
    if glosses.is_empty() {
        report.push(
            Finding::warning(
                filename,
                format!("Corpus data: No valid glosses defined for tiers: {}", tiers.join(", ")),
            )
            .with_fix("Add documentation for all gloss morphemes"),
        );
        return report;
    }

    let text = texts(doc, &tiers);
    let tokens: Vec<&str> = text.iter().flat_map(|t| t.split_whitespace()).collect();
    if tokens.is_empty() {
        report.push(
            Finding::critical(
                filename,
                format!("Corpus data: No annotated text found in one of the expected tiers: {}", tiers.join(", ")),
            )
            .with_fix("Check the tier documentation to make sure that your morphology tiers are covered"),
        );
        return report;
    }

    let separators: Vec<char> = criteria
        .gloss_separators()
        .iter()
        .flat_map(|s| s.chars())
        .collect();

    let mut matched = 0;
    let mut missing = 0;
    for token in tokens {
        state.gloss_freq.put(token);
        for morpheme in token.split(separators.as_slice()).filter(|m| !m.is_empty()) {
            state.morpheme_freq.put(morpheme);
            if GLOSS_SHAPE.is_match(morpheme) && !glosses.contains(morpheme) {
                missing += 1;
                state.missing_gloss_freq.put(morpheme);
            } else {
                matched += 1;
            }
        }
    }

    let total = matched + missing;
    let percent = percentage(matched, total);
    if matched * 100 < MORPHOLOGY_THRESHOLD * total {
        report.push(
            Finding::warning(
                filename,
                format!(
                    "Corpus data: Less than {} percent of tokens are valid gloss morphemes.\nValid: {} Invalid: {} Percentage valid: {:.1}",
                    MORPHOLOGY_THRESHOLD, matched, missing, percent
                ),
            )
            .with_fix("Improve the gloss documentation to cover more tokens"),
        );
    } else if missing == 0 {
        report.push(
            Finding::correct(filename, "Corpus data: All tokens valid glosses")
                .with_fix("Documentation cannot be improved"),
        );
    } else {
        report.push(
            Finding::correct(
                filename,
                format!(
                    "Corpus data: More than {} percent of tokens are valid gloss morphemes.\nValid: {} Invalid: {} Percentage valid: {:.1}",
                    MORPHOLOGY_THRESHOLD, matched, missing, percent
                ),
            )
            .with_fix("Documentation can be improved but no fix necessary"),
        );
    }
    report
}

// =============================================================================
// Finalize
// =============================================================================

fn frequency_listing(entries: &[(&str, usize)]) -> String {
    entries.iter().map(|(k, n)| format!("{} - {}\n", k, n)).collect()
}

/// Corpus-wide findings after every document was checked. `filename` is
/// the documentation spreadsheet.
pub fn finalize(state: &CorpusRunState, filename: &str, gloss_stats: bool) -> ComplianceReport {
    let mut report = ComplianceReport::new();

    for (gloss, _) in state.morpheme_freq.iter().filter(|(_, n)| *n == 0) {
        report.push(
            Finding::warning(filename, format!("Corpus data: Morpheme gloss never encountered in corpus: {}", gloss))
                .with_fix("Check for potential errors or remove gloss from documentation"),
        );
    }

    if !state.missing_gloss_freq.is_empty() {
        report.push(
            Finding::note(
                filename,
                format!(
                    "Corpus data: Morpheme glosses missing from documentations:\n{}",
                    frequency_listing(&state.missing_gloss_freq.by_count())
                ),
            )
            .with_fix("Add documentation for glosses"),
        );
    }

    if gloss_stats && !state.gloss_freq.is_empty() {
        report.push(Finding::note(
            filename,
            format!(
                "Corpus data: Glosses encountered in the corpus:\n{}",
                frequency_listing(&state.gloss_freq.by_count())
            ),
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::elan::tests::eaf;
    use crate::corpus::ElanDocument;
    use crate::models::{Gloss, Punctuation, Session, Tier, Transcription};
    use crate::report::Severity;

    fn tier(name: &str, function: &str) -> Tier {
        Tier { tier_name: name.into(), tier_functions: vec![function.into()], ..Default::default() }
    }

    fn gloss(gloss: &str, tiers: TierScope) -> Gloss {
        Gloss { gloss: gloss.into(), meaning: "m".into(), tiers, ..Default::default() }
    }

    fn criteria(graphemes: &[&str]) -> CriteriaModel {
        CriteriaModel {
            sessions: vec![Session {
                file_names: "s1.eaf".into(),
                speaker_names: "SP1".into(),
                ..Default::default()
            }],
            tiers: vec![tier("tx", "transcription"), tier("ge", "morpheme gloss")],
            transcriptions: graphemes
                .iter()
                .map(|g| Transcription { grapheme: g.to_string(), ..Default::default() })
                .collect(),
            glosses: vec![
                gloss("3SG", TierScope::All),
                gloss("PST", TierScope::Named(vec!["ge".into()])),
                gloss("DU", TierScope::All),
            ],
            punctuations: vec![Punctuation {
                character: "?".into(),
                tiers: TierScope::Named(vec!["tx".into()]),
                function: "end of question".into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn document(name: &str, tiers: &[(&str, &[&str])]) -> CorpusDocument {
        CorpusDocument::new(name, Box::new(ElanDocument::parse(&eaf(tiers)).unwrap()))
    }

    #[test]
    fn test_tier_resolution_with_speakers() {
        let criteria = criteria(&["a"]);
        let doc = document("s1.eaf", &[("tx@SP1", &["a"]), ("ge@SP1", &["3SG"]), ("tx@SP9", &["a"]), ("transcription", &["a"])]);
        assert_eq!(transcription_tiers(&criteria, &doc), vec!["tx@SP1", "transcription"]);
        let ge_only = document("s1.eaf", &[("ge@SP1", &["3SG"])]);
        assert_eq!(transcription_tiers(&criteria, &ge_only), vec!["transcription"]);
        assert_eq!(gloss_tiers(&criteria, &doc), vec!["ge@SP1"]);
    }

    #[test]
    fn test_inventory_selection() {
        let criteria = criteria(&["a", "b"]);
        let tx = vec!["tx@SP1".to_string()];
        let ge = vec!["ge".to_string()];
        assert_eq!(chunks_for(&criteria, &tx).into_iter().collect::<Vec<_>>(), vec!["?", "a", "b"]);
        assert_eq!(chunks_for(&criteria, &ge).len(), 2);
        assert_eq!(glosses_for(&criteria, &tx).len(), 2);
        assert_eq!(glosses_for(&criteria, &ge).len(), 3);
    }

    #[test]
    fn test_transcription_all_valid() {
        let criteria = criteria(&["a", "b", "ts"]);
        let doc = document("s1.eaf", &[("tx@SP1", &["ab tsa?", "3SG"])]);
        let mut state = CorpusRunState::new(&criteria);

        let report = check_transcription(&criteria, &doc, &mut state, LocationMode::Tiers);
        assert_eq!(report.len(), 1);
        assert_eq!(report.findings()[0].severity, Severity::Correct);
        assert_eq!(report.findings()[0].description, "Corpus data: All characters are valid");
        assert_eq!(state.token_freq.get("ab"), 1);
    }

    #[test]
    fn test_transcription_threshold_boundary() {
        // 99 valid characters and 1 invalid: exactly 99 percent passes
        let criteria = criteria(&["a"]);
        let text = format!("{} x", "a".repeat(99));
        let doc = document("s1.eaf", &[("tx", &[text.as_str()])]);
        let mut state = CorpusRunState::new(&criteria);
        let report = check_transcription(&criteria, &doc, &mut state, LocationMode::Tiers);
        assert!(!report.has_critical());
        let correct: Vec<_> = report.with_severity(Severity::Correct).collect();
        assert!(correct[0].description.contains("Percentage: 99.0"));
        let warning = report.with_severity(Severity::Warning).next().unwrap();
        assert_eq!(warning.location, Some(Location::tier("tx")));

        // 98 valid and 2 invalid fails
        let text = format!("{} xy", "a".repeat(98));
        let doc = document("s1.eaf", &[("tx", &[text.as_str()])]);
        let report = check_transcription(&criteria, &doc, &mut state, LocationMode::Skip);
        assert!(report.has_critical());
        let critical = report.with_severity(Severity::Critical).next().unwrap();
        assert!(critical.description.contains("Valid: 98 Invalid: 2 Percentage: 98.0"));
    }

    #[test]
    fn test_gloss_counts_only_as_whole_token() {
        let criteria = criteria(&["a"]);
        let doc = document("s1.eaf", &[("tx", &["aSGa 3SG a3SG"])]);
        let mut state = CorpusRunState::new(&criteria);
        let report = check_transcription(&criteria, &doc, &mut state, LocationMode::Skip);

        let warnings: Vec<_> = report.with_severity(Severity::Warning).map(|f| f.description.as_str()).collect();
        assert_eq!(
            warnings,
            vec![
                "Corpus data: Transcription token contains invalid character(s):\naSGa containing: [SG]",
                "Corpus data: Transcription token contains invalid character(s):\na3SG containing: [3SG]",
            ]
        );
        let critical = report.with_severity(Severity::Critical).next().unwrap();
        assert!(critical.description.contains("Valid: 3 Invalid: 8"));
    }

    #[test]
    fn test_invalid_token_residue_and_location() {
        let criteria = criteria(&["a", "b"]);
        let doc = document("s1.eaf", &[("tx@SP1", &["abc", "abc"])]);
        let mut state = CorpusRunState::new(&criteria);
        let report = check_transcription(&criteria, &doc, &mut state, LocationMode::Detailed);

        let warnings: Vec<_> = report.with_severity(Severity::Warning).collect();
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0].description,
            "Corpus data: Transcription token contains invalid character(s):\nabc containing: [c]"
        );
        assert_eq!(
            warnings[0].location.as_ref().map(|l| l.to_string()).as_deref(),
            Some("Tier:tx@SP1, Segment:a0, Time:00:00.000-00:01.000")
        );
        assert_eq!(state.token_freq.get("abc"), 2);
    }

    #[test]
    fn test_transcription_short_circuits() {
        let mut state = CorpusRunState::default();
        let criteria = criteria(&["a"]);

        let report = check_transcription(&criteria, &document("s1.eaf", &[("ft", &["a"])]), &mut state, LocationMode::Tiers);
        assert_eq!(report.len(), 1);
        assert_eq!(report.findings()[0].description, "Corpus data: No transcribed text found in tiers: transcription");

        let report = check_transcription(&criteria, &document("s1.eaf", &[("tx", &[" "])]), &mut state, LocationMode::Tiers);
        assert!(report.findings()[0].description.starts_with("Corpus data: No transcribed text found"));

        let empty = CriteriaModel { tiers: criteria.tiers.clone(), ..Default::default() };
        let report = check_transcription(&empty, &document("s1.eaf", &[("tx", &["a"])]), &mut state, LocationMode::Tiers);
        assert_eq!(report.len(), 1);
        assert!(report.findings()[0].description.starts_with("Transcription/Punctuation"));
        assert!(state.token_freq.is_empty());
    }

    #[test]
    fn test_morphology_counts_and_threshold() {
        let criteria = criteria(&["a"]);
        // go, 3SG, PST, house, DU valid; FOO missing: 5 of 6
        let doc = document("s1.eaf", &[("ge", &["go-3SG=PST house.DU", "FOO"])]);
        let mut state = CorpusRunState::new(&criteria);
        let mut criteria = criteria;
        criteria.punctuations.push(Punctuation {
            character: ".".into(),
            function: "morpheme break".into(),
            ..Default::default()
        });

        let report = check_morphology(&criteria, &doc, &mut state);
        assert_eq!(report.len(), 1);
        let finding = &report.findings()[0];
        assert_eq!(finding.severity, Severity::Correct);
        assert!(finding.description.contains("Valid: 5 Invalid: 1 Percentage valid: 83.3"));
        assert_eq!(state.morpheme_freq.get("3SG"), 1);
        assert_eq!(state.morpheme_freq.get("go"), 1);
        assert_eq!(state.missing_gloss_freq.get("FOO"), 1);
        assert_eq!(state.gloss_freq.get("go-3SG=PST"), 1);
    }

    #[test]
    fn test_morphology_below_threshold_is_warning() {
        let criteria = criteria(&["a"]);
        // 7 of 10 passes, 6 of 10 does not
        let passing = document("s1.eaf", &[("ge", &["3SG 3SG 3SG 3SG 3SG 3SG 3SG X1 X2 X3"])]);
        let failing = document("s1.eaf", &[("ge", &["3SG 3SG 3SG 3SG 3SG 3SG X0 X1 X2 X3"])]);
        let mut state = CorpusRunState::new(&criteria);

        let report = check_morphology(&criteria, &passing, &mut state);
        assert_eq!(report.findings()[0].severity, Severity::Correct);
        let report = check_morphology(&criteria, &failing, &mut state);
        assert_eq!(report.findings()[0].severity, Severity::Warning);
        assert!(report.findings()[0].description.starts_with("Corpus data: Less than 70 percent"));
    }

    #[test]
    fn test_morphology_short_circuits() {
        let criteria = criteria(&["a"]);
        let mut state = CorpusRunState::new(&criteria);

        let report = check_morphology(&criteria, &document("s1.eaf", &[("tx", &["a"])]), &mut state);
        assert_eq!(report.findings()[0].severity, Severity::Critical);
        assert_eq!(report.findings()[0].description, "Corpus composition: No morphology tiers found");

        let report = check_morphology(&criteria, &document("s1.eaf", &[("ge", &[])]), &mut state);
        assert_eq!(report.findings()[0].severity, Severity::Critical);

        let no_glosses = CriteriaModel { tiers: criteria.tiers.clone(), ..Default::default() };
        let report = check_morphology(&no_glosses, &document("s1.eaf", &[("ge", &["X"])]), &mut state);
        assert_eq!(report.findings()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_finalize() {
        let criteria = criteria(&["a"]);
        let mut state = CorpusRunState::new(&criteria);
        let doc = document("s1.eaf", &[("ge", &["3SG-FOO BAR-FOO"])]);
        check_morphology(&criteria, &doc, &mut state);

        let report = finalize(&state, "doc.fods", false);
        let warnings: Vec<_> = report.with_severity(Severity::Warning).map(|f| f.description.as_str()).collect();
        assert_eq!(
            warnings,
            vec![
                "Corpus data: Morpheme gloss never encountered in corpus: DU",
                "Corpus data: Morpheme gloss never encountered in corpus: PST",
            ]
        );
        let notes: Vec<_> = report.with_severity(Severity::Note).collect();
        assert_eq!(notes.len(), 1);
        assert_eq!(
            notes[0].description,
            "Corpus data: Morpheme glosses missing from documentations:\nFOO - 2\nBAR - 1\n"
        );

        let with_stats = finalize(&state, "doc.fods", true);
        assert_eq!(with_stats.count(Severity::Note), 2);
    }

    #[test]
    fn test_frequency_list_order() {
        let mut freq = FrequencyList::default();
        freq.put("b");
        freq.put("a");
        freq.put("b");
        freq.seed("c");
        freq.seed("b");
        assert_eq!(freq.by_count(), vec![("b", 2), ("a", 1), ("c", 0)]);
    }
}
