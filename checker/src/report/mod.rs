//! Compliance report: an ordered list of severity-tagged findings.
//!
//! Every check returns a [`ComplianceReport`] fragment. Fragments are merged
//! in the order the checks run, so the final report reads top to bottom like
//! the run itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Function name recorded on findings produced by this checker.
pub const CHECKER_FUNCTION: &str = "RefcoChecker";

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Documentation or corpus is not compliant and must be fixed.
    Critical,
    /// Likely a problem, may be intentional.
    Warning,
    /// Informational summary.
    Note,
    /// A check passed.
    Correct,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Note => "NOTE",
            Severity::Correct => "CORRECT",
        };
        f.write_str(label)
    }
}

/// Where in an annotation document a finding applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub tier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl Location {
    pub fn tier(tier: impl Into<String>) -> Self {
        Self { tier: tier.into(), segment: None, start: None, end: None }
    }

    /// Placeholder when a token could not be found again in the document.
    pub fn unknown() -> Self {
        Self::tier("Unknown")
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_time(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier:{}", self.tier)?;
        if let Some(segment) = &self.segment {
            write!(f, ", Segment:{}", segment)?;
        }
        if let (Some(start), Some(end)) = (&self.start, &self.end) {
            write!(f, ", Time:{}-{}", start, end)?;
        }
        Ok(())
    }
}

/// A single report item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub severity: Severity,
    pub function: String,
    pub filename: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub how_to_fix: Option<String>,
    /// Rendered error that caused the finding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Finding {
    pub fn new(severity: Severity, filename: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity,
            function: CHECKER_FUNCTION.to_string(),
            filename: filename.into(),
            description: description.into(),
            how_to_fix: None,
            exception: None,
            location: None,
        }
    }

    pub fn critical(filename: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Critical, filename, description)
    }

    pub fn warning(filename: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Warning, filename, description)
    }

    pub fn note(filename: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Note, filename, description)
    }

    pub fn correct(filename: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Correct, filename, description)
    }

    pub fn with_fix(mut self, how_to_fix: impl Into<String>) -> Self {
        self.how_to_fix = Some(how_to_fix.into());
        self
    }

    pub fn with_exception(mut self, error: &dyn std::error::Error) -> Self {
        self.exception = Some(error.to_string());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.filename, self.description)?;
        if let Some(location) = &self.location {
            write!(f, " ({})", location)?;
        }
        if let Some(fix) = &self.how_to_fix {
            write!(f, "\n    fix: {}", fix)?;
        }
        if let Some(exception) = &self.exception {
            write!(f, "\n    cause: {}", exception)?;
        }
        Ok(())
    }
}

/// Counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub critical: usize,
    pub warning: usize,
    pub note: usize,
    pub correct: usize,
}

/// Ordered collection of findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    findings: Vec<Finding>,
}

impl ComplianceReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Append all findings of `other`, keeping their order.
    pub fn merge(&mut self, other: ComplianceReport) {
        self.findings.extend(other.findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    pub fn has_critical(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Critical)
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        self.findings.iter().fold(ReportSummary::default(), |mut s, f| {
            match f.severity {
                Severity::Critical => s.critical += 1,
                Severity::Warning => s.warning += 1,
                Severity::Note => s.note += 1,
                Severity::Correct => s.correct += 1,
            }
            s
        })
    }
}

impl From<Finding> for ComplianceReport {
    fn from(finding: Finding) -> Self {
        Self { findings: vec![finding] }
    }
}

impl IntoIterator for ComplianceReport {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_preserves_order() {
        let mut first = ComplianceReport::new();
        first.push(Finding::critical("doc.ods", "a"));
        let mut second = ComplianceReport::new();
        second.push(Finding::warning("x.eaf", "b"));
        second.push(Finding::correct("x.eaf", "c"));

        first.merge(second);
        let descriptions: Vec<_> = first.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(descriptions, vec!["a", "b", "c"]);
        assert!(first.has_critical());
    }

    #[test]
    fn test_summary_counts() {
        let mut report = ComplianceReport::new();
        report.push(Finding::warning("f", "w1"));
        report.push(Finding::warning("f", "w2"));
        report.push(Finding::note("f", "n"));

        let summary = report.summary();
        assert_eq!(summary.critical, 0);
        assert_eq!(summary.warning, 2);
        assert_eq!(summary.note, 1);
        assert_eq!(report.count(Severity::Warning), 2);
        assert!(!report.has_critical());
    }

    #[test]
    fn test_location_display() {
        let loc = Location::tier("tx@SP1")
            .with_segment("a12")
            .with_time("00:01.200", "00:02.050");
        assert_eq!(loc.to_string(), "Tier:tx@SP1, Segment:a12, Time:00:01.200-00:02.050");
        assert_eq!(Location::unknown().to_string(), "Tier:Unknown");
    }

    #[test]
    fn test_finding_serialization() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let finding = Finding::critical("a.eaf", "Corpus data: cannot read")
            .with_fix("Check file")
            .with_exception(&err);
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["severity"], "CRITICAL");
        assert_eq!(json["howToFix"], "Check file");
        assert_eq!(json["exception"], "gone");
        assert!(json.get("location").is_none());
    }
}
