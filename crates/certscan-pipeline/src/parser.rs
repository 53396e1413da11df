use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// CSS selector for the card-name heading on a rendered certificate page.
const CARD_NAME_SELECTOR: &str = r#"h2[class*="sm:text-2xl"]"#;

/// CSS selector for the grade badge next to the heading.
const GRADE_SELECTOR: &str = r#"div[class*="w-3/4"][class*="bg-gold"]"#;

/// Lowercase fragments that mark a definitive "no such certificate" page.
const NOT_FOUND_MARKERS: &[&str] = &["certificate not found", "no certificate found"];

/// Lowercase fragments that mark a bot-challenge interstitial.
const CHALLENGE_MARKERS: &[&str] = &[
    "g-recaptcha",
    "recaptcha",
    "cf-challenge",
    "checking your browser",
    "verify you are human",
];

/// Fields extracted from a rendered certificate page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCert {
    pub card_name: String,
    pub grade: String,
}

/// What one rendering of the lookup page turned out to be.
///
/// `Blank` and `Unrecognized` are non-terminal: the fetcher keeps polling
/// until the content wait expires. The other three resolve immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Certificate fields rendered
    Found(ParsedCert),
    /// Definitive no-such-certificate marker present
    NotFound,
    /// Bot-challenge interstitial detected
    Challenge,
    /// Page carries visible text, but nothing recognizable
    Unrecognized,
    /// No visible text yet (still hydrating, or navigation produced nothing)
    Blank,
}

/// Classify one snapshot of the rendered lookup page.
pub fn classify(html: &str) -> ParseOutcome {
    let lowered = html.to_lowercase();
    if NOT_FOUND_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return ParseOutcome::NotFound;
    }

    let document = Html::parse_document(html);
    if let Some(cert) = extract_cert(&document) {
        return ParseOutcome::Found(cert);
    }

    if CHALLENGE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return ParseOutcome::Challenge;
    }

    if has_visible_text(&document) {
        ParseOutcome::Unrecognized
    } else {
        ParseOutcome::Blank
    }
}

fn extract_cert(document: &Html) -> Option<ParsedCert> {
    let name_selector = Selector::parse(CARD_NAME_SELECTOR).expect("valid selector");
    let grade_selector = Selector::parse(GRADE_SELECTOR).expect("valid selector");

    let name_element = document.select(&name_selector).next()?;
    let card_name = normalize_whitespace(&name_element.text().collect::<String>());
    if card_name.is_empty() {
        return None;
    }

    let grade_element = document.select(&grade_selector).next()?;
    let grade = grade_element.text().collect::<String>().trim().to_string();
    if grade.is_empty() {
        return None;
    }

    Some(ParsedCert { card_name, grade })
}

fn has_visible_text(document: &Html) -> bool {
    let body_selector = Selector::parse("body").expect("valid selector");
    document
        .select(&body_selector)
        .next()
        .is_some_and(|body| body.text().any(|chunk| !chunk.trim().is_empty()))
}

/// Collapse interior whitespace runs, as the card name spans nested markup.
fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
