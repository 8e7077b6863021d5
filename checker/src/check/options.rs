//! Options of a check run.
//!
//! Defaults come from [`CheckOptions::default`], can be overridden from the
//! environment (`REFCO_*`, `.env` is honoured by the binary) or read from a
//! JSON file. Command line flags are applied last by the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::corpus::text::LocationMode;
use crate::error::CheckResult;

/// Options for [`super::check_corpus`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckOptions {
    /// Skip the spreadsheet rules (Overview, sessions, tiers, tables)
    pub skip_documentation_check: bool,

    /// Skip the transcription character check of every document
    pub skip_transcription_check: bool,

    /// Skip the morpheme gloss check of every document
    pub skip_gloss_check: bool,

    /// Add a Note with the frequency of every gloss seen in the corpus
    pub gloss_stats: bool,

    /// Do not look up where invalid tokens occur
    pub skip_locations: bool,

    /// Locate invalid tokens down to annotation and time span
    pub detailed_locations: bool,

    /// Never touch the network; URL and Glottolog checks are not performed
    pub offline: bool,

    /// Tab separated ISO-639-3 code table
    pub iso_codes: Option<PathBuf>,

    /// Timeout of a single URL lookup
    pub http_timeout_secs: u64,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            skip_documentation_check: false,
            skip_transcription_check: false,
            skip_gloss_check: false,
            gloss_stats: false,
            skip_locations: false,
            detailed_locations: false,
            offline: false,
            iso_codes: None,
            http_timeout_secs: 10,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl CheckOptions {
    /// Defaults overridden by `REFCO_*` environment variables.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        options.apply_env();
        options
    }

    /// Override fields from `REFCO_*` environment variables that are set.
    pub fn apply_env(&mut self) {
        if let Some(v) = env_flag("REFCO_SKIP_DOCUMENTATION_CHECK") {
            self.skip_documentation_check = v;
        }
        if let Some(v) = env_flag("REFCO_SKIP_TRANSCRIPTION_CHECK") {
            self.skip_transcription_check = v;
        }
        if let Some(v) = env_flag("REFCO_SKIP_GLOSS_CHECK") {
            self.skip_gloss_check = v;
        }
        if let Some(v) = env_flag("REFCO_GLOSS_STATS") {
            self.gloss_stats = v;
        }
        if let Some(v) = env_flag("REFCO_SKIP_LOCATIONS") {
            self.skip_locations = v;
        }
        if let Some(v) = env_flag("REFCO_DETAILED_LOCATIONS") {
            self.detailed_locations = v;
        }
        if let Some(v) = env_flag("REFCO_OFFLINE") {
            self.offline = v;
        }
        if let Ok(path) = std::env::var("REFCO_ISO_CODES") {
            if !path.trim().is_empty() {
                self.iso_codes = Some(PathBuf::from(path.trim()));
            }
        }
        if let Some(secs) = std::env::var("REFCO_HTTP_TIMEOUT").ok().and_then(|v| v.trim().parse().ok()) {
            self.http_timeout_secs = secs;
        }
    }

    /// Read options from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> CheckResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn location_mode(&self) -> LocationMode {
        if self.skip_locations {
            LocationMode::Skip
        } else if self.detailed_locations {
            LocationMode::Detailed
        } else {
            LocationMode::Tiers
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
