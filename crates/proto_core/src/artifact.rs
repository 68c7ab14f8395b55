//! The three-part prototype artifact and the fenced-block extractor.
//!
//! A generation response is free text that should contain language-tagged
//! fenced code blocks. The extractor is tolerant: a missing or malformed
//! fence yields an empty field, never an error. Empty fields are caught
//! later by the syntax sanity checker.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One design iteration's output: markup, styling and behavior blobs.
///
/// Each field is independently optional (empty string when absent). The
/// artifact is replaced wholesale by every generation pass; nothing is
/// merged across iterations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    /// HTML markup fragment
    pub markup: String,
    /// CSS styling
    pub style: String,
    /// JavaScript behavior
    pub behavior: String,
}

impl Artifact {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        behavior: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            behavior: behavior.into(),
        }
    }

    /// True when no field holds any content.
    pub fn is_empty(&self) -> bool {
        self.markup.trim().is_empty()
            && self.style.trim().is_empty()
            && self.behavior.trim().is_empty()
    }

    /// Compose a self-contained HTML document with the style inlined in the
    /// head and the behavior inlined at the end of the body.
    ///
    /// Used both by the renderer bridge (temp document) and by finalization
    /// (published file), so the judged page and the published page are the
    /// same bytes.
    pub fn to_document(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <title>{title}</title>\n\
             <style>\n{style}\n</style>\n\
             </head>\n\
             <body>\n\
             {markup}\n\
             <script>\n{behavior}\n</script>\n\
             </body>\n\
             </html>",
            title = title,
            style = self.style,
            markup = self.markup,
            behavior = self.behavior,
        )
    }
}

/// Fence tags recognized per artifact field, first match wins.
const MARKUP_TAGS: &[&str] = &["html", "markup"];
const STYLE_TAGS: &[&str] = &["css", "style"];
const BEHAVIOR_TAGS: &[&str] = &["javascript", "js"];

/// Extract an [`Artifact`] from a raw completion response.
///
/// Looks for ```` ```<tag> ```` fenced blocks for each field, trying the
/// primary tag before its fallback. Contents are trimmed. No fence, no
/// closing fence, or an empty block all produce an empty field.
pub fn extract_artifact(response: &str) -> Artifact {
    Artifact {
        markup: extract_fenced(response, MARKUP_TAGS),
        style: extract_fenced(response, STYLE_TAGS),
        behavior: extract_fenced(response, BEHAVIOR_TAGS),
    }
}

fn extract_fenced(response: &str, tags: &[&str]) -> String {
    for tag in tags {
        // (?s) lets `.` span lines; the fence tag must terminate the line.
        let pattern = format!(r"(?s)```{}[ \t]*\r?\n(.*?)```", regex::escape(tag));
        let re = Regex::new(&pattern).expect("static fence pattern");
        if let Some(caps) = re.captures(response) {
            if let Some(body) = caps.get(1) {
                return body.as_str().trim().to_string();
            }
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_all_three_sections() {
        let response = "Here is your prototype:\n\
            ```html\n<div class=\"app\">hi</div>\n```\n\
            ```css\n.app { color: red; }\n```\n\
            ```javascript\ndocument.addEventListener('click', () => {});\n```\n";

        let artifact = extract_artifact(response);
        assert_eq!(artifact.markup, "<div class=\"app\">hi</div>");
        assert_eq!(artifact.style, ".app { color: red; }");
        assert!(artifact.behavior.contains("addEventListener"));
    }

    #[test]
    fn test_fallback_tags() {
        let response = "```js\nconsole.log('x');\n```\n```markup\n<p>a</p>\n```";
        let artifact = extract_artifact(response);
        assert_eq!(artifact.behavior, "console.log('x');");
        assert_eq!(artifact.markup, "<p>a</p>");
        assert_eq!(artifact.style, "");
    }

    #[test]
    fn test_missing_fences_yield_empty_fields() {
        let artifact = extract_artifact("no code here, sorry");
        assert!(artifact.is_empty());
    }

    #[test]
    fn test_unclosed_fence_yields_empty_field() {
        let response = "```html\n<div>never closed";
        let artifact = extract_artifact(response);
        assert_eq!(artifact.markup, "");
    }

    #[test]
    fn test_to_document_inlines_everything() {
        let artifact = Artifact::new("<main>x</main>", "main { margin: 0; }", "let a = 1;");
        let doc = artifact.to_document("Prototype");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Prototype</title>"));
        assert!(doc.contains("main { margin: 0; }"));
        assert!(doc.contains("<main>x</main>"));
        assert!(doc.contains("let a = 1;"));
        // style must land in head, behavior in body
        let head_end = doc.find("</head>").unwrap();
        assert!(doc.find("main { margin: 0; }").unwrap() < head_end);
        assert!(doc.find("let a = 1;").unwrap() > head_end);
    }
}
