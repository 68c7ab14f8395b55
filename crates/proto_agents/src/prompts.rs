//! Prompt and rubric text for the designer and judge stages, plus verdict
//! parsing.
//!
//! The two judging rubrics differ deliberately: the vision rubric is
//! lenient toward aesthetics, the text rubric scores five dimensions.
//! Product has been asked whether the asymmetry is intended; until then
//! both are kept distinct.

use proto_core::{RequirementProfile, Verdict};

/// System prompt for the generation model.
pub const DESIGNER_SYSTEM_PROMPT: &str = "\
You are a professional front-end engineer and UI/UX designer who builds \
high-fidelity prototypes.

Generate complete HTML, CSS and JavaScript for a working, polished \
prototype of the requested design.

Requirements:
1. The code must be complete and runnable as-is
2. Use semantic HTML structure
3. Modern CSS with responsive layout
4. JavaScript for the necessary interactions
5. No external dependencies; everything self-contained

Output exactly three fenced blocks in this format:

```html
[HTML markup]
```

```css
[CSS styles]
```

```javascript
[JavaScript]
```

If reviewer feedback is included, revise the prototype accordingly.";

/// Build the designer user prompt from requirements, their classification,
/// and optional feedback from the previous iteration.
pub fn designer_prompt(
    requirements: &str,
    profile: &RequirementProfile,
    prior_feedback: Option<&str>,
) -> String {
    let mut prompt = format!(
        "User requirements:\n{requirements}\n\nRequirement analysis:\n{analysis}\n\n\
         Generate the high-fidelity prototype code for these requirements.",
        requirements = requirements,
        analysis = profile.describe(),
    );
    if let Some(feedback) = prior_feedback {
        prompt.push_str(&format!(
            "\n\nReviewer feedback from the previous iteration:\n{feedback}\n\
             Revise the code to address this feedback."
        ));
    }
    prompt
}

/// System prompt for the vision judge: biased toward functional
/// completeness, explicitly not a pixel critic.
pub const VISION_JUDGE_SYSTEM_PROMPT: &str = "\
You are a product reviewer looking at a rendered screenshot of a web \
prototype.

Judge whether the prototype fulfils the user's requirements. Reject ONLY \
for missing functionality or an unusable interface. Do NOT reject for \
aesthetic nitpicks, spacing, or color taste.

Answer with a single verdict keyword on the first line: APPROVED or \
REJECTED. If REJECTED, follow with the concrete functional problems and \
how to fix them.";

/// System prompt for the text-only judge: stricter, five dimensions.
pub const TEXT_JUDGE_SYSTEM_PROMPT: &str = "\
You are a product manager and UI/UX reviewer validating a web prototype \
from its source code.

Evaluate the prototype on these dimensions:
1. Functional completeness: does it implement everything requested?
2. UX: is the interface intuitive and pleasant to use?
3. Responsiveness: does it adapt to different screen sizes?
4. Interactivity: are the interactions implemented and coherent?
5. Code quality: is the code well structured?

Answer with a single verdict keyword on the first line: APPROVED or \
REJECTED.

If REJECTED, list the concrete problems and improvement suggestions with \
priorities. If APPROVED, briefly state the strengths.";

/// Build the user prompt for the vision judge.
pub fn vision_judge_prompt(requirements: &str, iteration: u32) -> String {
    format!(
        "Original user requirements:\n{requirements}\n\n\
         The attached screenshot shows the rendered prototype \
         (iteration {iteration}). Validate it against the requirements."
    )
}

/// Build the user prompt for the text judge from the raw artifact blobs.
pub fn text_judge_prompt(
    requirements: &str,
    markup: &str,
    style: &str,
    behavior: &str,
    iteration: u32,
) -> String {
    format!(
        "Original user requirements:\n{requirements}\n\n\
         Generated code (iteration {iteration}):\n\n\
         HTML:\n```html\n{markup}\n```\n\n\
         CSS:\n```css\n{style}\n```\n\n\
         JavaScript:\n```javascript\n{behavior}\n```\n\n\
         Validate this prototype against the requirements."
    )
}

/// Parse a judge response into a verdict.
///
/// REJECTED is checked first so a response containing both keywords (an
/// ambiguous answer) stays rejected; a response with neither keyword is
/// rejected as the safe default.
pub fn parse_verdict(response: &str) -> Verdict {
    let upper = response.to_uppercase();
    if upper.contains("REJECTED") {
        Verdict::Rejected
    } else if upper.contains("APPROVED") {
        Verdict::Approved
    } else {
        Verdict::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_core::classify_requirements;

    #[test]
    fn test_parse_verdict_approved() {
        assert_eq!(parse_verdict("APPROVED\nNice work."), Verdict::Approved);
        assert_eq!(parse_verdict("verdict: approved"), Verdict::Approved);
    }

    #[test]
    fn test_parse_verdict_rejected() {
        assert_eq!(parse_verdict("REJECTED\nMissing the form."), Verdict::Rejected);
    }

    #[test]
    fn test_ambiguous_response_is_rejected() {
        assert_eq!(parse_verdict("I cannot tell."), Verdict::Rejected);
        assert_eq!(parse_verdict(""), Verdict::Rejected);
        // both keywords present counts as ambiguous
        assert_eq!(
            parse_verdict("APPROVED... actually REJECTED"),
            Verdict::Rejected
        );
    }

    #[test]
    fn test_designer_prompt_threads_feedback() {
        let profile = classify_requirements("a login form");
        let prompt = designer_prompt("a login form", &profile, Some("add a password field"));
        assert!(prompt.contains("a login form"));
        assert!(prompt.contains("add a password field"));
        assert!(prompt.contains("prototype type"));

        let without = designer_prompt("a login form", &profile, None);
        assert!(!without.contains("Reviewer feedback"));
    }

    #[test]
    fn test_text_judge_prompt_carries_all_blobs() {
        let prompt = text_judge_prompt("req", "<div>m</div>", ".a{}", "let x;", 3);
        assert!(prompt.contains("<div>m</div>"));
        assert!(prompt.contains(".a{}"));
        assert!(prompt.contains("let x;"));
        assert!(prompt.contains("iteration 3"));
    }
}
