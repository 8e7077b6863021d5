//! Language code acceptance.
//!
//! A language cell is accepted when it names a common translation language,
//! is an ISO-639-3 code, or is a Glottolog languoid id that resolves online.
//! Languages already rejected once are remembered and accepted afterwards,
//! so each unknown language is reported a single time per run.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::LanguageResult;
use crate::logs::log_warning;

/// Accepted translation languages, matched by substring.
pub const TRANSLATION_LANGUAGES: &[&str] = &[
    "mandarin chinese",
    "english",
    "french",
    "german",
    "indonesian",
    "portuguese",
    "russian",
    "spanish",
];

pub const GLOTTOLOG_URL: &str = "https://glottolog.org/resource/languoid/id/";

/// Minimum spacing between two requests of [`HttpOracle`].
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

static GLOTTOCODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w{4}\d{4}$").expect("valid glottocode regex"));

// =============================================================================
// URL oracle
// =============================================================================

/// Answers whether a URL resolves.
pub trait UrlOracle {
    fn exists(&self, url: &str) -> bool;

    /// False when the oracle never asks the network.
    fn is_online(&self) -> bool {
        true
    }
}

impl<F> UrlOracle for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, url: &str) -> bool {
        self(url)
    }
}

/// Blocking HTTP GET, true only on status 200.
pub struct HttpOracle {
    client: reqwest::blocking::Client,
    last_request: Mutex<Option<Instant>>,
}

impl HttpOracle {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { client, last_request: Mutex::new(None) }
    }

    fn wait_turn(&self) {
        let mut last = match self.last_request.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                std::thread::sleep(MIN_REQUEST_INTERVAL - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

impl UrlOracle for HttpOracle {
    fn exists(&self, url: &str) -> bool {
        self.wait_turn();
        match self.client.get(url).send() {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                log_warning(format!("Request to {} failed: {}", url, e));
                false
            }
        }
    }
}

/// Never touches the network; every URL is unresolved.
pub struct OfflineOracle;

impl UrlOracle for OfflineOracle {
    fn exists(&self, _url: &str) -> bool {
        false
    }

    fn is_online(&self) -> bool {
        false
    }
}

// =============================================================================
// ISO-639-3 table
// =============================================================================

/// The set of ISO-639-3 codes.
#[derive(Debug, Clone, Default)]
pub struct IsoCodes {
    codes: HashSet<String>,
}

impl IsoCodes {
    /// Read the SIL code table: tab separated, code in the first column,
    /// header line starting with `Id`.
    pub fn from_reader<R: std::io::Read>(reader: R) -> LanguageResult<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);
        let mut codes = HashSet::new();
        for record in csv.records() {
            let record = record?;
            let Some(code) = record.get(0).map(str::trim) else {
                continue;
            };
            if code.is_empty() || code.starts_with("Id") {
                continue;
            }
            codes.insert(code.to_string());
        }
        Ok(Self { codes })
    }

    pub fn from_path(path: &Path) -> LanguageResult<Self> {
        Self::from_reader(File::open(path)?)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IsoCodes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { codes: iter.into_iter().map(Into::into).collect() }
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Stateful language check for one run.
pub struct LanguageValidator<'a> {
    known: HashSet<String>,
    iso: IsoCodes,
    oracle: &'a dyn UrlOracle,
}

impl<'a> LanguageValidator<'a> {
    pub fn new(iso: IsoCodes, oracle: &'a dyn UrlOracle) -> Self {
        Self { known: HashSet::new(), iso, oracle }
    }

    pub fn oracle(&self) -> &dyn UrlOracle {
        self.oracle
    }

    /// Whether `lang` is acceptable. A language rejected once is accepted on
    /// later calls.
    pub fn is_valid(&mut self, lang: &str) -> bool {
        let lower = lang.to_lowercase();
        if self.known.contains(&lower) {
            return true;
        }
        if TRANSLATION_LANGUAGES.iter().any(|t| t.contains(lower.as_str())) {
            return true;
        }
        if lang.chars().count() == 3 {
            return self.iso.contains(lang);
        }
        if GLOTTOCODE.is_match(lang) && self.oracle.exists(&format!("{}{}", GLOTTOLOG_URL, lang)) {
            return true;
        }
        self.known.insert(lower);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn iso() -> IsoCodes {
        ["deu", "eng", "fra"].into_iter().collect()
    }

    #[test]
    fn test_known_unknown_is_reported_once() {
        let oracle = |_: &str| false;
        let mut validator = LanguageValidator::new(iso(), &oracle);
        assert!(!validator.is_valid("foobar"));
        assert!(validator.is_valid("foobar"));
        assert!(validator.is_valid("FooBar"));
    }

    #[test]
    fn test_translation_languages_by_substring() {
        let oracle = |_: &str| false;
        let mut validator = LanguageValidator::new(IsoCodes::default(), &oracle);
        assert!(validator.is_valid("English"));
        assert!(validator.is_valid("Chinese"));
        assert!(validator.is_valid("port"));
    }

    #[test]
    fn test_iso_codes_are_case_sensitive_and_not_cached() {
        let oracle = |_: &str| false;
        let mut validator = LanguageValidator::new(iso(), &oracle);
        assert!(validator.is_valid("deu"));
        assert!(!validator.is_valid("xyz"));
        assert!(!validator.is_valid("xyz"));
        assert!(!validator.is_valid("DEU"));
    }

    #[test]
    fn test_glottocode_goes_to_oracle() {
        let calls = Cell::new(0);
        let oracle = |url: &str| {
            calls.set(calls.get() + 1);
            url.ends_with("abcd1234")
        };
        let mut validator = LanguageValidator::new(IsoCodes::default(), &oracle);
        assert!(validator.is_valid("abcd1234"));
        assert!(!validator.is_valid("wxyz9876"));
        assert!(validator.is_valid("wxyz9876"));
        assert_eq!(calls.get(), 2);
        // Wrong shape never reaches the oracle
        assert!(!validator.is_valid("ab12"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_offline_oracle() {
        let offline = OfflineOracle;
        assert!(!offline.is_online());
        assert!(!offline.exists("https://example.org"));
        let online = |_: &str| true;
        assert!(online.is_online());
    }

    #[test]
    fn test_iso_table_from_reader() {
        let table = "Id\tPart2B\tPart2T\tPart1\tScope\tLanguage_Type\tRef_Name\tComment\n\
                     aaa\t\t\t\tI\tL\tGhotuo\t\n\
                     deu\tger\tdeu\tde\tI\tL\tGerman\t\n\
                     \n\
                     eng\teng\teng\ten\tI\tL\tEnglish\n";
        let codes = IsoCodes::from_reader(table.as_bytes()).unwrap();
        assert_eq!(codes.len(), 3);
        assert!(codes.contains("deu"));
        assert!(!codes.contains("Id"));
    }

    #[test]
    fn test_iso_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(IsoCodes::from_path(&dir.path().join("iso-639-3.tab")).is_err());
    }
}
