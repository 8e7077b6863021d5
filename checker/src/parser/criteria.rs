//! Reading the [`CriteriaModel`] out of a normalized spreadsheet.
//!
//! Problems with the tables themselves (a table is missing, rows are short)
//! are returned as findings next to whatever could still be read.

use super::table::{
    find_table, find_table_by_prefix, read_rows, text_in_row, Header, Sheet, Table, TableRows, TableSpec,
};
use crate::models::{
    split_values, CriteriaModel, Gloss, InformationNotes, Punctuation, Session, Tier, TierScope, Transcription,
};
use crate::report::{ComplianceReport, Finding};

pub const OVERVIEW: &str = "Overview";

pub const SESSIONS: TableSpec =
    TableSpec { label: "CorpusComposition", header: Header::Prefix("Session"), min_columns: 8 };
pub const TIERS: TableSpec = TableSpec { label: "AnnotationTiers", header: Header::Exact("Names"), min_columns: 4 };
pub const TRANSCRIPTIONS: TableSpec =
    TableSpec { label: "Transcription", header: Header::Exact("Graphemes"), min_columns: 3 };
pub const GLOSSES: TableSpec = TableSpec { label: "Glosses", header: Header::Exact("Abbreviations"), min_columns: 4 };
pub const PUNCTUATIONS: TableSpec =
    TableSpec { label: "Punctuations", header: Header::Exact("Characters"), min_columns: 5 };

/// Cell texts standing for a single space in the punctuation table.
const VISIBLE_SPACE: &[&str] = &["â£", "␣"];

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

/// Read all documentation tables. `filename` is the short spreadsheet name
/// used on findings.
pub fn read_criteria(sheet: &Sheet, filename: &str) -> (CriteriaModel, ComplianceReport) {
    let mut report = ComplianceReport::new();
    let mut criteria = CriteriaModel::default();

    match find_table(sheet, OVERVIEW) {
        Some(overview) => read_overview(overview, &mut criteria),
        None => report.push(table_not_found(filename, OVERVIEW)),
    }

    if let Some(rows) = table_rows(sheet, SESSIONS, filename, &mut report) {
        criteria.sessions = rows.iter().map(|r| read_session(r)).collect();
    }
    if let Some(rows) = table_rows(sheet, TIERS, filename, &mut report) {
        criteria.tiers = rows.iter().map(|r| read_tier(r)).collect();
    }
    if let Some(rows) = table_rows(sheet, TRANSCRIPTIONS, filename, &mut report) {
        criteria.transcriptions = rows
            .iter()
            .map(|r| Transcription {
                grapheme: cell(r, 0),
                linguistic_value: cell(r, 1),
                linguistic_convention: cell(r, 2),
            })
            .collect();
    }
    if let Some(rows) = table_rows(sheet, GLOSSES, filename, &mut report) {
        criteria.glosses = rows
            .iter()
            .map(|r| Gloss {
                gloss: cell(r, 0).split_whitespace().collect(),
                meaning: cell(r, 1),
                comments: cell(r, 2),
                tiers: TierScope::parse(&cell(r, 3)),
            })
            .collect();
    }
    if let Some(rows) = table_rows(sheet, PUNCTUATIONS, filename, &mut report) {
        criteria.punctuations = rows.iter().map(|r| read_punctuation(r)).collect();
    }

    (criteria, report)
}

fn table_not_found(filename: &str, label: &str) -> Finding {
    Finding::critical(filename, format!("Corpus documentation: {} table not found", label))
        .with_fix(format!("Add table {} to corpus documentation", label))
}

/// Locate and read one list table, reporting absence or missing data.
fn table_rows(sheet: &Sheet, spec: TableSpec, filename: &str, report: &mut ComplianceReport) -> Option<Vec<Vec<String>>> {
    let table: Option<&Table> = if spec.label == GLOSSES.label {
        find_table_by_prefix(sheet, "Gloss")
    } else {
        find_table(sheet, spec.label)
    };
    let Some(table) = table else {
        report.push(table_not_found(filename, spec.label));
        return None;
    };
    let TableRows { rows, missing_data } = read_rows(table, &spec);
    if missing_data {
        report.push(
            Finding::critical(
                filename,
                format!("Corpus documentation: Wrong number of columns or missing data in {} table", spec.label),
            )
            .with_fix("Check number of columns and presence of data in all cells"),
        );
    }
    Some(rows)
}

fn read_overview(table: &Table, criteria: &mut CriteriaModel) {
    let value = |title: &str| text_in_row(table, title, 2);
    let notes = |title: &str| InformationNotes::new(text_in_row(table, title, 2), text_in_row(table, title, 3));

    criteria.corpus_title = value("Corpus Title");
    criteria.subject_languages = value("Subject Language(s)");
    criteria.archive = value("Archive");
    criteria.persistent_id = value("Corpus Persistent Identifier");
    criteria.annotation_license = value("Annotation Files Licence");
    criteria.recording_license = value("Recording Files Licence");
    criteria.creator_name = value("Corpus Creator Name");
    criteria.creator_contact = value("Corpus Creator Contact");
    criteria.creator_institution = value("Corpus Creator Institution");
    criteria.refco_version = notes("Corpus Documentation's Version");
    criteria.number_sessions = notes("Number of sessions");
    criteria.number_transcribed_words = notes("Total number of transcribed words");
    criteria.number_annotated_words = notes("Total number of morphologically analyzed words");
    criteria.translation_languages = notes("Translation language(s)");
}

fn read_session(row: &[String]) -> Session {
    Session {
        session_name: cell(row, 0),
        file_names: cell(row, 1),
        speaker_names: cell(row, 2),
        speaker_ages: cell(row, 3),
        speaker_gender: cell(row, 4),
        recording_location: cell(row, 5),
        recording_date: cell(row, 6),
        genre: cell(row, 7),
    }
}

fn read_tier(row: &[String]) -> Tier {
    Tier {
        tier_name: cell(row, 0),
        tier_functions: split_values(&cell(row, 1)).iter().map(|f| f.to_lowercase()).collect(),
        segmentation_strategy: cell(row, 2),
        languages: cell(row, 3),
        morpheme_distinction: row.get(4).filter(|v| !v.is_empty()).cloned(),
    }
}

fn read_punctuation(row: &[String]) -> Punctuation {
    let mut character = cell(row, 0);
    if VISIBLE_SPACE.contains(&character.as_str()) {
        character = " ".to_string();
    }
    Punctuation {
        character,
        meaning: cell(row, 1),
        comments: cell(row, 2),
        tiers: TierScope::parse(&cell(row, 3)),
        function: cell(row, 4),
    }
}
