//! Free-text response summaries: counts, lengths and top keywords

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::dataset::SurveyResponse;

/// Keywords reported per question unless configured otherwise
pub const DEFAULT_KEYWORD_LIMIT: usize = 5;

/// English function words excluded from keyword ranking
pub const TEXT_STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "this", "that", "have", "from", "your", "you", "are", "was",
    "were", "what", "when", "where", "which", "into", "onto", "our", "their", "they", "them",
    "then", "than", "but", "not", "yes", "no", "ok", "okay", "very", "much", "more", "less",
];

static TEXT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9\x{AC00}-\x{D7A3}]+").expect("valid token pattern"));

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuestionSummary {
    pub question_id: String,
    pub question_label: String,
    pub response_count: usize,
    pub average_length: f64,
    pub top_keywords: Vec<String>,
}

fn is_keyword(token: &str) -> bool {
    token.chars().count() >= 2
        && !token.chars().all(|c| c.is_ascii_digit())
        && !TEXT_STOPWORDS.contains(&token)
}

/// Most frequent keywords across `values`, highest count first. Equal counts
/// keep first-occurrence order.
pub fn extract_top_keywords<S: AsRef<str>>(values: &[S], limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for value in values {
        let lower = value.as_ref().to_lowercase();
        for token in TEXT_TOKEN.find_iter(&lower) {
            let token = token.as_str().to_string();
            if !is_keyword(&token) {
                continue;
            }
            match positions.get(&token) {
                Some(&idx) => counts[idx].1 += 1,
                None => {
                    positions.insert(token.clone(), counts.len());
                    counts.push((token, 1));
                }
            }
        }
    }

    // Stable sort keeps first-occurrence order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(token, _)| token).collect()
}

/// Summarize the string answers of one question.
pub fn summarize_text_responses<'a, I>(
    question_id: &str,
    question_label: &str,
    responses: I,
    keyword_limit: usize,
) -> TextQuestionSummary
where
    I: IntoIterator<Item = &'a SurveyResponse>,
{
    let texts: Vec<&str> = responses
        .into_iter()
        .filter_map(|r| r.value.as_text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let average_length = if texts.is_empty() {
        0.0
    } else {
        texts.iter().map(|s| s.chars().count()).sum::<usize>() as f64 / texts.len() as f64
    };

    TextQuestionSummary {
        question_id: question_id.to_string(),
        question_label: question_label.to_string(),
        response_count: texts.len(),
        average_length,
        top_keywords: extract_top_keywords(&texts, keyword_limit),
    }
}
