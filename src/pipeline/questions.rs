//! Question index and numeric value extraction
//!
//! Question metadata is taken from the first response seen for each question
//! id. Iteration order everywhere is first-seen order of the dataset, which
//! keeps every downstream result deterministic.

use std::collections::HashMap;

use super::coerce::coerce_numeric;
use super::dataset::{AnalysisDataset, ResponseType, SurveyResponse};

/// Display metadata for one question
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionMeta {
    pub label: String,
    pub category: Option<String>,
    pub dominant_type: ResponseType,
}

/// Insertion-ordered map of question id to metadata
#[derive(Debug, Clone, Default)]
pub struct QuestionIndex {
    entries: Vec<(String, QuestionMeta)>,
    positions: HashMap<String, usize>,
}

impl QuestionIndex {
    /// Build the index for every question in the dataset.
    pub fn build(dataset: &AnalysisDataset) -> Self {
        let mut grouped: Vec<(String, Vec<&SurveyResponse>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for response in &dataset.responses {
            match positions.get(&response.question_id) {
                Some(&idx) => grouped[idx].1.push(response),
                None => {
                    positions.insert(response.question_id.clone(), grouped.len());
                    grouped.push((response.question_id.clone(), vec![response]));
                }
            }
        }

        let entries = grouped
            .into_iter()
            .map(|(question_id, responses)| {
                let first = responses[0];
                if let Some(other) = responses
                    .iter()
                    .find(|r| r.question_label != first.question_label)
                {
                    tracing::warn!(
                        question = %question_id,
                        kept = %first.question_label,
                        ignored = %other.question_label,
                        "conflicting labels for one question id"
                    );
                }
                let label = if first.question_label.is_empty() {
                    question_id.clone()
                } else {
                    first.question_label.clone()
                };
                let meta = QuestionMeta {
                    label,
                    category: first.category.clone(),
                    dominant_type: dominant_response_type(&responses)
                        .unwrap_or(ResponseType::Text),
                };
                (question_id, meta)
            })
            .collect();

        Self { entries, positions }
    }

    pub fn get(&self, question_id: &str) -> Option<&QuestionMeta> {
        self.positions
            .get(question_id)
            .map(|&idx| &self.entries[idx].1)
    }

    /// Display label, falling back to the id for unknown questions
    pub fn label<'a>(&'a self, question_id: &'a str) -> &'a str {
        self.get(question_id)
            .map(|meta| meta.label.as_str())
            .unwrap_or(question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QuestionMeta)> {
        self.entries.iter().map(|(id, meta)| (id.as_str(), meta))
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Majority vote over declared types. Ties keep the type seen first.
pub fn dominant_response_type(responses: &[&SurveyResponse]) -> Option<ResponseType> {
    let mut counts: Vec<(ResponseType, usize)> = Vec::new();
    for response in responses {
        match counts.iter_mut().find(|(t, _)| *t == response.response_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((response.response_type, 1)),
        }
    }

    let (mut dominant, mut max_count) = *counts.first()?;
    for &(response_type, count) in &counts[1..] {
        if count > max_count {
            dominant = response_type;
            max_count = count;
        }
    }
    Some(dominant)
}

/// Which declared types take part in numeric extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericOptions {
    pub include_boolean: bool,
    pub include_text: bool,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            include_boolean: true,
            include_text: false,
        }
    }
}

impl NumericOptions {
    /// Whether a response's declared type takes part
    pub fn admits(&self, response: &SurveyResponse) -> bool {
        match response.response_type {
            ResponseType::Text => self.include_text,
            ResponseType::Boolean => self.include_boolean,
            _ => true,
        }
    }
}

/// Coerced numeric values of one question, in dataset order
pub fn extract_numeric_values(
    responses: &[SurveyResponse],
    question_id: &str,
    options: NumericOptions,
) -> Vec<f64> {
    responses
        .iter()
        .filter(|r| r.question_id == question_id && options.admits(r))
        .filter_map(|r| coerce_numeric(&r.value))
        .collect()
}

/// Question ids with at least `min_count` coercible numeric responses, in
/// first-seen order.
pub fn numeric_question_ids(
    dataset: &AnalysisDataset,
    min_count: usize,
    options: NumericOptions,
) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for response in &dataset.responses {
        if !options.admits(response) || coerce_numeric(&response.value).is_none() {
            continue;
        }
        let id = response.question_id.as_str();
        match positions.get(id) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(id, counts.len());
                counts.push((id, 1));
            }
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Per-respondent numeric answers to one question. A respondent who answered
/// twice keeps the later value but the position of the first answer.
fn respondent_values<'a>(
    responses: &'a [SurveyResponse],
    question_id: &str,
    options: NumericOptions,
) -> (Vec<&'a str>, HashMap<&'a str, f64>) {
    let mut order = Vec::new();
    let mut values = HashMap::new();
    for response in responses {
        if response.question_id != question_id || !options.admits(response) {
            continue;
        }
        if let Some(value) = coerce_numeric(&response.value) {
            let respondent = response.respondent_id.as_str();
            if values.insert(respondent, value).is_none() {
                order.push(respondent);
            }
        }
    }
    (order, values)
}

/// Numeric answers to two questions, aligned by respondent.
///
/// Only respondents with a coercible answer to both questions are kept;
/// order follows the first question's respondents.
pub fn align_by_respondent(
    responses: &[SurveyResponse],
    question_id1: &str,
    question_id2: &str,
    options: NumericOptions,
) -> (Vec<f64>, Vec<f64>) {
    let (order, first) = respondent_values(responses, question_id1, options);
    let (_, second) = respondent_values(responses, question_id2, options);

    order
        .into_iter()
        .filter_map(|respondent| Some((first[respondent], *second.get(respondent)?)))
        .unzip()
}
