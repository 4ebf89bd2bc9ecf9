//! Paired t-tests between auto-detected pre/post questions

use serde::Serialize;

use super::dataset::AnalysisDataset;
use super::descriptive::{mean, sample_variance};
use super::pairing::{detect_pairs, detect_timepoint, timepoint_key};
use super::questions::{align_by_respondent, NumericOptions, QuestionIndex};
use super::special::two_tailed_p_value;

/// Two-tailed significance threshold
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Saturated t statistic reported when every difference is identical
pub const SATURATED_T: f64 = 999.0;

/// Minimum respondents answering both questions
const MIN_PAIRED_RESPONDENTS: usize = 2;

/// Result of one paired t-test. Differences are `B - A`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TTestResult {
    pub question_a_id: String,
    pub question_b_id: String,
    pub question_a_label: String,
    pub question_b_label: String,
    pub n: usize,
    pub mean_a: f64,
    pub mean_b: f64,
    pub mean_diff: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Paired t-test of question `a_id` against `b_id`, aligned by respondent.
///
/// Returns `None` when fewer than two respondents answered both questions
/// numerically. When every difference is identical and non-zero the result is
/// saturated (`t = ±999`, `p = 0`).
pub fn paired_t_test(
    dataset: &AnalysisDataset,
    a_id: &str,
    b_id: &str,
    index: &QuestionIndex,
) -> Option<TTestResult> {
    let (values_a, values_b) =
        align_by_respondent(&dataset.responses, a_id, b_id, NumericOptions::default());
    let n = values_a.len();
    if n < MIN_PAIRED_RESPONDENTS {
        tracing::debug!(a = a_id, b = b_id, n, "too few paired respondents for t-test");
        return None;
    }

    let diffs: Vec<f64> = values_a
        .iter()
        .zip(&values_b)
        .map(|(a, b)| b - a)
        .collect();

    let mean_a = mean(&values_a)?;
    let mean_b = mean(&values_b)?;
    let mean_diff = mean(&diffs)?;
    let std_diff = sample_variance(&diffs).max(0.0).sqrt();

    let (t_statistic, p_value) = if std_diff == 0.0 {
        if mean_diff != 0.0 {
            (SATURATED_T.copysign(mean_diff), 0.0)
        } else {
            (0.0, 1.0)
        }
    } else {
        let t = mean_diff / (std_diff / (n as f64).sqrt());
        (t, two_tailed_p_value(t.abs(), (n - 1) as f64))
    };

    Some(TTestResult {
        question_a_id: a_id.to_string(),
        question_b_id: b_id.to_string(),
        question_a_label: index.label(a_id).to_string(),
        question_b_label: index.label(b_id).to_string(),
        n,
        mean_a,
        mean_b,
        mean_diff,
        t_statistic,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
    })
}

/// Detect pre/post pairs from labels and test each one.
pub fn generate_paired_t_tests(dataset: &AnalysisDataset) -> Vec<TTestResult> {
    let index = QuestionIndex::build(dataset);
    let pairs = detect_pairs(&index, detect_timepoint, timepoint_key);
    tracing::debug!(pairs = pairs.len(), "pre/post pairs detected");

    pairs
        .iter()
        .filter_map(|pair| paired_t_test(dataset, &pair.first, &pair.second, &index))
        .collect()
}
