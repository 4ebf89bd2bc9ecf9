//! Coercion of raw survey answers into numeric scores
//!
//! A failed coercion is not an error: the response is simply left out of
//! numeric aggregates and stays visible to frequency and text analysis.

use std::sync::LazyLock;

use regex::Regex;

use super::dataset::ResponseValue;

/// Korean satisfaction phrases and their 1-5 scores.
///
/// Matched by substring containment in table order, so every compound phrase
/// must precede the simple phrase it contains ("매우만족" before "만족").
pub const LIKERT_PHRASES: &[(&str, f64)] = &[
    ("매우불만족", 1.0),
    ("매우만족", 5.0),
    ("불만족", 2.0),
    ("보통", 3.0),
    ("만족", 4.0),
];

/// Whole-token affirmative answers (case-insensitive)
pub const YES_TOKENS: &[&str] = &["O", "YES", "TRUE"];

/// Whole-token negative answers (case-insensitive)
pub const NO_TOKENS: &[&str] = &["X", "NO", "FALSE"];

/// Korean yes/no, compared against the whole whitespace-stripped answer
pub const KOREAN_YES: &str = "예";
pub const KOREAN_NO: &str = "아니오";

static YES_PATTERN: LazyLock<Regex> = LazyLock::new(|| whole_token_pattern(YES_TOKENS));
static NO_PATTERN: LazyLock<Regex> = LazyLock::new(|| whole_token_pattern(NO_TOKENS));
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").expect("valid numeric token pattern"));

/// Token delimited by start/end or any character outside `[A-Za-z0-9_]`
fn whole_token_pattern(tokens: &[&str]) -> Regex {
    let alternation = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?:^|[^A-Za-z0-9_])(?:{})(?:[^A-Za-z0-9_]|$)",
        alternation
    ))
    .expect("valid yes/no token pattern")
}

/// Coerce a raw answer into a numeric score.
///
/// Rules, first match wins:
/// 1. finite number → itself
/// 2. boolean → 1 / 0
/// 3. string: Likert phrase, yes/no token, whole-string number, then the
///    first numeric substring anywhere in the text
pub fn coerce_numeric(value: &ResponseValue) -> Option<f64> {
    match value {
        ResponseValue::Number(n) => n.is_finite().then_some(*n),
        ResponseValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        ResponseValue::Text(s) => coerce_text(s),
    }
}

fn coerce_text(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if let Some(score) = likert_score(&compact) {
        return Some(score);
    }

    let upper = trimmed.to_uppercase();
    if YES_PATTERN.is_match(&upper) || compact == KOREAN_YES {
        return Some(1.0);
    }
    if NO_PATTERN.is_match(&upper) || compact == KOREAN_NO {
        return Some(0.0);
    }

    if let Ok(parsed) = trimmed.parse::<f64>() {
        if parsed.is_finite() {
            return Some(parsed);
        }
    }

    NUMERIC_TOKEN
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Score of the first Likert phrase contained in `compact`
pub fn likert_score(compact: &str) -> Option<f64> {
    LIKERT_PHRASES
        .iter()
        .find(|(phrase, _)| compact.contains(phrase))
        .map(|(_, score)| *score)
}
