//! Cheap structural sanity checks on a generated artifact.
//!
//! Deterministic, side-effect free, and independent of any model call.
//! Runs on every generation output before the judge sees it; a failing
//! report forces rejection regardless of the judge's opinion.

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;

/// Strictness of the brace-balance rule for styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Checking the three raw blobs of an iteration; mismatched style
    /// braces are only a warning.
    Fragment,
    /// Checking a full composed document before publishing; mismatched
    /// braces are an error.
    Document,
}

/// Outcome of a syntax check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl SyntaxReport {
    /// One-line summary of the errors, used to prefix rejection feedback.
    pub fn error_summary(&self) -> String {
        self.errors.join("; ")
    }
}

/// Markers that count as recognizable document structure.
const STRUCTURAL_TAGS: &[&str] = &["<html", "<body", "<div", "<section", "<main"];

/// Markers that count as a recognizable interactivity construct.
const INTERACTIVITY_MARKERS: &[&str] = &["function", "=>", "addEventListener"];

/// Check an artifact's structure.
///
/// Rules:
/// - empty markup is an error;
/// - markup without any structural tag is a warning;
/// - non-empty style with mismatched `{`/`}` counts is a warning in
///   [`CheckMode::Fragment`] and an error in [`CheckMode::Document`];
/// - non-empty behavior without any interactivity construct is a warning.
///
/// `is_valid` is false iff at least one error was recorded.
pub fn check_artifact(artifact: &Artifact, mode: CheckMode) -> SyntaxReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let markup = artifact.markup.trim();
    if markup.is_empty() {
        errors.push("markup is empty".to_string());
    } else {
        let lower = markup.to_lowercase();
        if !STRUCTURAL_TAGS.iter().any(|tag| lower.contains(tag)) {
            warnings.push("markup lacks a recognizable structural tag".to_string());
        }
    }

    let style = artifact.style.trim();
    if !style.is_empty() {
        let open = style.matches('{').count();
        let close = style.matches('}').count();
        if open != close {
            let msg = format!("style has mismatched braces ({} open, {} close)", open, close);
            match mode {
                CheckMode::Fragment => warnings.push(msg),
                CheckMode::Document => errors.push(msg),
            }
        }
    }

    let behavior = artifact.behavior.trim();
    if !behavior.is_empty()
        && !INTERACTIVITY_MARKERS.iter().any(|m| behavior.contains(m))
    {
        warnings.push("behavior lacks a recognizable interactivity construct".to_string());
    }

    SyntaxReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_markup_is_invalid() {
        let artifact = Artifact::new("", ".a { color: red; }", "");
        let report = check_artifact(&artifact, CheckMode::Fragment);
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("markup is empty"));
    }

    #[test]
    fn test_balanced_braces_never_flag_style() {
        let artifact = Artifact::new("<div>x</div>", ".a { color: red; }", "");
        for mode in [CheckMode::Fragment, CheckMode::Document] {
            let report = check_artifact(&artifact, mode);
            assert!(report.is_valid);
            assert!(!report
                .errors
                .iter()
                .chain(report.warnings.iter())
                .any(|m| m.contains("braces")));
        }
    }

    #[test]
    fn test_mismatched_braces_strictness_split() {
        let artifact = Artifact::new("<div>x</div>", ".a { color: red;", "");

        let loose = check_artifact(&artifact, CheckMode::Fragment);
        assert!(loose.is_valid);
        assert!(loose.warnings.iter().any(|w| w.contains("braces")));

        let strict = check_artifact(&artifact, CheckMode::Document);
        assert!(!strict.is_valid);
        assert!(strict.errors.iter().any(|e| e.contains("braces")));
    }

    #[test]
    fn test_unstructured_markup_is_a_warning_not_an_error() {
        let artifact = Artifact::new("just some text", "", "");
        let report = check_artifact(&artifact, CheckMode::Fragment);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_inert_behavior_warns() {
        let artifact = Artifact::new("<div>x</div>", "", "var a = 1;");
        let report = check_artifact(&artifact, CheckMode::Fragment);
        assert!(report.is_valid);
        assert!(report.warnings.iter().any(|w| w.contains("interactivity")));
    }

    #[test]
    fn test_error_summary_joins_errors() {
        let artifact = Artifact::new("", ".a {", "");
        let report = check_artifact(&artifact, CheckMode::Document);
        let summary = report.error_summary();
        assert!(summary.contains("markup is empty"));
        assert!(summary.contains("braces"));
    }
}
