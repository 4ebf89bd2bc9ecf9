//! Automatic question pairing from label heuristics
//!
//! Detection (`detect_timepoint`, `detect_ipa_role`) decides which side of a
//! pair a label belongs to. Bucketing (`pair_by_key`) groups labels by a
//! normalized key and pairs the two sides. Both paired analyses (pre/post
//! t-tests and importance/performance IPA) share the bucketing step.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::dataset::ResponseType;
use super::questions::QuestionIndex;

/// Tokens marking a "before" measurement
pub const PRE_TOKENS: &[&str] = &[
    "사전", "pre", "before", "baseline", "1차", "1회", "t1", "time1",
];

/// Tokens marking an "after" measurement
pub const POST_TOKENS: &[&str] = &[
    "사후", "post", "after", "followup", "2차", "2회", "t2", "time2",
];

/// Tokens marking an importance rating
pub const IMPORTANCE_TOKENS: &[&str] = &["중요도", "중요성", "중요", "importance"];

/// Tokens marking a performance / satisfaction rating
pub const PERFORMANCE_TOKENS: &[&str] = &["만족도", "만족", "성과", "performance", "satisfaction"];

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").expect("valid bracket pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static DELIMITED_PRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s(\[])전(?:$|[\s)\]])").expect("valid 전 pattern"));
static DELIMITED_POST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s(\[])후(?:$|[\s)\]])").expect("valid 후 pattern"));

/// Measurement time of a pre/post question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timepoint {
    Pre,
    Post,
}

/// Role of a question in importance-performance analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpaRole {
    Importance,
    Performance,
}

/// Which side of a pair a question sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    First,
    Second,
}

impl From<Timepoint> for PairSide {
    fn from(timepoint: Timepoint) -> Self {
        match timepoint {
            Timepoint::Pre => PairSide::First,
            Timepoint::Post => PairSide::Second,
        }
    }
}

impl From<IpaRole> for PairSide {
    fn from(role: IpaRole) -> Self {
        match role {
            IpaRole::Importance => PairSide::First,
            IpaRole::Performance => PairSide::Second,
        }
    }
}

/// Two question ids detected as belonging together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPair {
    pub first: String,
    pub second: String,
}

/// Lowercase, drop `[...]` / `(...)` segments, collapse whitespace.
pub fn normalize_label(label: &str) -> String {
    let lower = label.to_lowercase();
    let stripped = BRACKETED.replace_all(&lower, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Whole-word match for ASCII tokens, where word characters are ASCII
/// alphanumerics and `_`.
fn contains_ascii_word(haystack: &str, token: &str) -> bool {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    haystack.match_indices(token).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + token.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

fn matches_token(lower: &str, token: &str) -> bool {
    if token.chars().all(|c| c.is_ascii_alphanumeric()) {
        contains_ascii_word(lower, token)
    } else {
        lower.contains(token)
    }
}

/// Detect whether a label denotes a pre or post measurement.
///
/// Labels carrying both pre and post tokens are ambiguous and yield `None`.
/// The single-character Korean markers 전/후 only count when delimited by
/// whitespace, brackets or the label boundary.
pub fn detect_timepoint(label: &str) -> Option<Timepoint> {
    let lower = label.to_lowercase();
    let has_pre = PRE_TOKENS.iter().any(|t| matches_token(&lower, t));
    let has_post = POST_TOKENS.iter().any(|t| matches_token(&lower, t));

    match (has_pre, has_post) {
        (true, true) => None,
        (true, false) => Some(Timepoint::Pre),
        (false, true) => Some(Timepoint::Post),
        (false, false) => {
            if DELIMITED_PRE.is_match(label) {
                Some(Timepoint::Pre)
            } else if DELIMITED_POST.is_match(label) {
                Some(Timepoint::Post)
            } else {
                None
            }
        }
    }
}

/// Keep only ASCII alphanumerics and Hangul syllables
fn compact_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || ('\u{AC00}'..='\u{D7A3}').contains(c))
        .collect()
}

fn strip_tokens(mut key: String, tokens: &[&str]) -> String {
    for token in tokens {
        key = key.replace(token, " ");
    }
    key
}

/// Bucket key for pre/post pairing: the normalized label without any
/// timepoint markers.
pub fn timepoint_key(label: &str) -> String {
    let key = strip_tokens(normalize_label(label), PRE_TOKENS);
    let key = strip_tokens(key, POST_TOKENS);
    let key = DELIMITED_PRE.replace_all(&key, " ");
    let key = DELIMITED_POST.replace_all(&key, " ");
    compact_key(&key)
}

/// Detect whether a label denotes an importance or a performance rating.
/// Labels matching both are ambiguous and yield `None`.
pub fn detect_ipa_role(label: &str) -> Option<IpaRole> {
    let lower = label.to_lowercase();
    let has_importance = IMPORTANCE_TOKENS.iter().any(|t| lower.contains(t));
    let has_performance = PERFORMANCE_TOKENS.iter().any(|t| lower.contains(t));

    match (has_importance, has_performance) {
        (true, false) => Some(IpaRole::Importance),
        (false, true) => Some(IpaRole::Performance),
        _ => None,
    }
}

/// Bucket key for importance/performance pairing
pub fn ipa_key(label: &str) -> String {
    let key = strip_tokens(normalize_label(label), IMPORTANCE_TOKENS);
    compact_key(&strip_tokens(key, PERFORMANCE_TOKENS))
}

/// Pair candidates that share a key.
///
/// Buckets are visited in first-seen key order. Within a bucket each side's
/// ids are sorted lexicographically and zipped; surplus ids on the longer
/// side are dropped.
pub fn pair_by_key<I>(candidates: I) -> Vec<QuestionPair>
where
    I: IntoIterator<Item = (String, PairSide, String)>,
{
    let mut buckets: Vec<(String, Vec<String>, Vec<String>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (key, side, question_id) in candidates {
        let idx = *positions.entry(key.clone()).or_insert_with(|| {
            buckets.push((key, Vec::new(), Vec::new()));
            buckets.len() - 1
        });
        match side {
            PairSide::First => buckets[idx].1.push(question_id),
            PairSide::Second => buckets[idx].2.push(question_id),
        }
    }

    let mut pairs = Vec::new();
    for (key, mut first, mut second) in buckets {
        first.sort();
        second.sort();
        if first.len() != second.len() {
            tracing::debug!(
                key = %key,
                first = first.len(),
                second = second.len(),
                "unbalanced pairing bucket, surplus questions dropped"
            );
        }
        pairs.extend(
            first
                .into_iter()
                .zip(second)
                .map(|(first, second)| QuestionPair { first, second }),
        );
    }
    pairs
}

/// Run detection and bucketing over every non-text question of the index.
pub fn detect_pairs<D, S, K>(index: &QuestionIndex, detect: D, key: K) -> Vec<QuestionPair>
where
    D: Fn(&str) -> Option<S>,
    S: Into<PairSide>,
    K: Fn(&str) -> String,
{
    let candidates = index.iter().filter_map(|(question_id, meta)| {
        if meta.dominant_type == ResponseType::Text {
            return None;
        }
        let side = detect(&meta.label)?.into();
        let key = key(&meta.label);
        if key.is_empty() {
            return None;
        }
        Some((key, side, question_id.to_string()))
    });
    pair_by_key(candidates)
}
