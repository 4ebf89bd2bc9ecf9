//! Descriptive statistics and frequency distributions per question

use std::cmp::Ordering;
use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;

use super::dataset::{AnalysisDataset, ResponseType, ResponseValue, SurveyResponse};
use super::questions::{extract_numeric_values, NumericOptions, QuestionIndex};

/// Summary statistics over the numeric answers of one question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: Option<f64>,
    pub min: f64,
    pub max: f64,
    /// Sample variance (n − 1 denominator)
    pub variance: f64,
    pub std_dev: f64,
    pub sum: f64,
}

impl BasicStats {
    fn empty() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            median: 0.0,
            mode: None,
            min: 0.0,
            max: 0.0,
            variance: 0.0,
            std_dev: 0.0,
            sum: 0.0,
        }
    }
}

/// One bucket of a frequency distribution over raw answers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyBucket {
    pub value: ResponseValue,
    pub count: usize,
    pub percentage: f64,
}

/// Per-question analysis result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub question_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub response_type: ResponseType,
    pub response_count: usize,
    pub stats: BasicStats,
    pub distribution: Vec<FrequencyBucket>,
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample variance with the n − 1 denominator; 0 for fewer than two values
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / n as f64;
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Calculate count, mean, median, mode, min, max, variance, std dev and sum.
pub fn calculate_basic_stats(values: &[f64]) -> BasicStats {
    if values.is_empty() {
        return BasicStats::empty();
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = sample_variance(values);

    BasicStats {
        count,
        mean,
        median,
        mode: mode_of_sorted(&sorted),
        min: sorted[0],
        max: sorted[count - 1],
        variance,
        std_dev: variance.sqrt(),
        sum,
    }
}

/// Most frequent value of a sorted slice; ties resolve to the smallest value
fn mode_of_sorted(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut run_start = 0;
    for i in 1..=sorted.len() {
        if i == sorted.len() || sorted[i] != sorted[run_start] {
            let run_len = i - run_start;
            if best.map_or(true, |(_, best_len)| run_len > best_len) {
                best = Some((sorted[run_start], run_len));
            }
            run_start = i;
        }
    }
    best.map(|(value, _)| value)
}

/// Grouping key that keeps number / bool / string identity apart
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BucketKey {
    Number(u64),
    Bool(bool),
    Text(String),
}

impl From<&ResponseValue> for BucketKey {
    fn from(value: &ResponseValue) -> Self {
        match value {
            // -0.0 and 0.0 share a bucket
            ResponseValue::Number(n) => BucketKey::Number((n + 0.0).to_bits()),
            ResponseValue::Bool(b) => BucketKey::Bool(*b),
            ResponseValue::Text(s) => BucketKey::Text(s.clone()),
        }
    }
}

/// Frequency distribution over raw, uncoerced answers.
///
/// Sorted ascending: numbers numerically, everything else by its string form.
/// Numbers come before non-numbers when a question mixes both.
pub fn frequency_distribution<'a, I>(values: I) -> Vec<FrequencyBucket>
where
    I: IntoIterator<Item = &'a ResponseValue>,
{
    let mut buckets: Vec<(ResponseValue, usize)> = Vec::new();
    let mut positions: HashMap<BucketKey, usize> = HashMap::new();
    let mut total = 0usize;

    for value in values {
        total += 1;
        let key = BucketKey::from(value);
        match positions.get(&key) {
            Some(&idx) => buckets[idx].1 += 1,
            None => {
                positions.insert(key, buckets.len());
                buckets.push((value.clone(), 1));
            }
        }
    }

    if total == 0 {
        return Vec::new();
    }

    let mut distribution: Vec<FrequencyBucket> = buckets
        .into_iter()
        .map(|(value, count)| FrequencyBucket {
            value,
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();

    distribution.sort_by(|a, b| compare_values(&a.value, &b.value));
    distribution
}

/// Numbers sort ahead of every other value. Mixed pairs compared by string
/// form alone would not be transitive, so `sort_by` could see an inconsistent order.
fn compare_values(a: &ResponseValue, b: &ResponseValue) -> Ordering {
    match (a, b) {
        (ResponseValue::Number(x), ResponseValue::Number(y)) => x.total_cmp(y),
        (ResponseValue::Number(_), _) => Ordering::Less,
        (_, ResponseValue::Number(_)) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Statistics for every question in the dataset, in first-seen order.
pub fn analyze_questions(dataset: &AnalysisDataset) -> Vec<QuestionStats> {
    let index = QuestionIndex::build(dataset);

    let mut grouped: HashMap<&str, Vec<&SurveyResponse>> = HashMap::new();
    for response in &dataset.responses {
        grouped
            .entry(response.question_id.as_str())
            .or_default()
            .push(response);
    }

    let questions: Vec<(&str, Vec<&SurveyResponse>)> = index
        .question_ids()
        .map(|id| (id, grouped.remove(id).unwrap_or_default()))
        .collect();

    questions
        .into_par_iter()
        .map(|(question_id, responses)| {
            let meta = index.get(question_id);
            let numeric =
                extract_numeric_values(&dataset.responses, question_id, NumericOptions::default());

            QuestionStats {
                question_id: question_id.to_string(),
                question_label: index.label(question_id).to_string(),
                category: meta.and_then(|m| m.category.clone()),
                response_type: meta.map_or(ResponseType::Text, |m| m.dominant_type),
                response_count: responses.len(),
                stats: calculate_basic_stats(&numeric),
                distribution: frequency_distribution(responses.iter().map(|r| &r.value)),
            }
        })
        .collect()
}
