//! Lightweight keyword classification of requirement text.
//!
//! A deterministic, local heuristic (not a model call) whose output is
//! embedded in the generation prompt to bias the designer model.

use serde::{Deserialize, Serialize};

/// Broad category of the requested prototype.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrototypeKind {
    Form,
    Dashboard,
    Ecommerce,
    Blog,
    Navigation,
    Unknown,
}

/// Visual style preference inferred from the text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StylePreference {
    Minimal,
    Business,
    Creative,
    Modern,
}

/// Classification of a requirement description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub kind: PrototypeKind,
    pub style: StylePreference,
    pub interactive: bool,
    pub responsive: bool,
}

impl RequirementProfile {
    /// Render the profile as prompt-friendly lines.
    pub fn describe(&self) -> String {
        format!(
            "- prototype type: {:?}\n- style: {:?}\n- needs interaction: {}\n- responsive: {}",
            self.kind, self.style, self.interactive, self.responsive
        )
    }
}

/// Classify requirement text by keyword matching.
pub fn classify_requirements(requirements: &str) -> RequirementProfile {
    let lower = requirements.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    let kind = if has(&["login", "register", "signup", "sign up", "form"]) {
        PrototypeKind::Form
    } else if has(&["dashboard", "chart", "analytics", "metrics", "data"]) {
        PrototypeKind::Dashboard
    } else if has(&["shop", "cart", "checkout", "ecommerce", "e-commerce", "store"]) {
        PrototypeKind::Ecommerce
    } else if has(&["blog", "article", "post", "content"]) {
        PrototypeKind::Blog
    } else if has(&["navigation", "menu", "landing", "page"]) {
        PrototypeKind::Navigation
    } else {
        PrototypeKind::Unknown
    };

    let style = if has(&["minimal", "minimalist", "simple", "clean"]) {
        StylePreference::Minimal
    } else if has(&["business", "corporate", "professional"]) {
        StylePreference::Business
    } else if has(&["creative", "artistic", "playful"]) {
        StylePreference::Creative
    } else {
        StylePreference::Modern
    };

    let interactive = has(&["click", "interactive", "animation", "effect", "drag", "hover"]);
    // Every prototype is expected to adapt to screen sizes.
    let responsive = true;

    RequirementProfile {
        kind,
        style,
        interactive,
        responsive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_detection() {
        let profile = classify_requirements("A login form with username and password");
        assert_eq!(profile.kind, PrototypeKind::Form);
    }

    #[test]
    fn test_dashboard_and_interactivity() {
        let profile = classify_requirements("An analytics dashboard with clickable charts");
        assert_eq!(profile.kind, PrototypeKind::Dashboard);
        assert!(profile.interactive);
    }

    #[test]
    fn test_defaults_for_empty_input() {
        let profile = classify_requirements("");
        assert_eq!(profile.kind, PrototypeKind::Unknown);
        assert_eq!(profile.style, StylePreference::Modern);
        assert!(!profile.interactive);
        assert!(profile.responsive);
    }

    #[test]
    fn test_style_preference() {
        let profile = classify_requirements("a clean minimalist landing page");
        assert_eq!(profile.style, StylePreference::Minimal);
        assert_eq!(profile.kind, PrototypeKind::Navigation);
    }
}
