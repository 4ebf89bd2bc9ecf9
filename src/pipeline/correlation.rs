//! Respondent-aligned Pearson correlation between numeric questions

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use super::dataset::AnalysisDataset;
use super::questions::{align_by_respondent, numeric_question_ids, NumericOptions, QuestionIndex};

/// Minimum aligned respondent pairs before a correlation is computed
pub const MIN_CORRELATION_PAIRS: usize = 3;

/// Minimum numeric responses for a question to be auto-selected
const MIN_NUMERIC_RESPONSES: usize = 2;

/// Qualitative strength of a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    None,
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        let abs_r = r.abs();
        if abs_r >= 0.7 {
            CorrelationStrength::Strong
        } else if abs_r >= 0.4 {
            CorrelationStrength::Moderate
        } else if abs_r >= 0.2 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::None
        }
    }
}

impl std::fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationStrength::Strong => write!(f, "strong"),
            CorrelationStrength::Moderate => write!(f, "moderate"),
            CorrelationStrength::Weak => write!(f, "weak"),
            CorrelationStrength::None => write!(f, "none"),
        }
    }
}

/// Correlation between two already-aligned series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub correlation: f64,
    pub strength: CorrelationStrength,
}

/// Symmetric correlation matrix over a set of questions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    /// Question labels, one per row/column
    pub variables: Vec<String>,
    pub question_ids: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

/// An off-diagonal matrix entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub question1: String,
    pub question2: String,
    pub correlation: f64,
    pub strength: CorrelationStrength,
}

impl CorrelationMatrix {
    pub fn empty() -> Self {
        Self {
            variables: Vec::new(),
            question_ids: Vec::new(),
            matrix: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Off-diagonal pairs with |r| >= `min_abs`, strongest first
    pub fn strongest_pairs(&self, min_abs: f64) -> Vec<CorrelatedPair> {
        let n = self.len();
        let mut pairs = Vec::new();

        for i in 0..n {
            for j in (i + 1)..n {
                let corr = self.matrix[i][j];
                if corr.abs() >= min_abs && !corr.is_nan() {
                    pairs.push(CorrelatedPair {
                        question1: self.variables[i].clone(),
                        question2: self.variables[j].clone(),
                        correlation: corr,
                        strength: CorrelationStrength::from_coefficient(corr),
                    });
                }
            }
        }

        pairs.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        pairs
    }
}

/// Pearson correlation of two equal-length series.
///
/// Returns 0 for fewer than three points, mismatched lengths, or any
/// non-finite result (e.g. a constant series).
pub fn safe_correlation(values1: &[f64], values2: &[f64]) -> f64 {
    let n = values1.len();
    if n < MIN_CORRELATION_PAIRS || n != values2.len() {
        return 0.0;
    }

    let mean1 = values1.iter().sum::<f64>() / n as f64;
    let mean2 = values2.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var1 = 0.0;
    let mut var2 = 0.0;
    for (x, y) in values1.iter().zip(values2) {
        let dx = x - mean1;
        let dy = y - mean2;
        cov += dx * dy;
        var1 += dx * dx;
        var2 += dy * dy;
    }

    let r = cov / (var1.sqrt() * var2.sqrt());
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Correlation plus its qualitative strength
pub fn calculate_correlation(values1: &[f64], values2: &[f64]) -> CorrelationResult {
    let correlation = safe_correlation(values1, values2);
    CorrelationResult {
        correlation,
        strength: CorrelationStrength::from_coefficient(correlation),
    }
}

/// Build the correlation matrix across `question_ids`.
///
/// When no ids are given (or the list is empty), every question with at least
/// two numeric responses is used. Values are aligned by respondent; pairs with
/// fewer than three aligned respondents get 0.
pub fn generate_correlation_matrix(
    dataset: &AnalysisDataset,
    question_ids: Option<&[String]>,
) -> CorrelationMatrix {
    let ids: Vec<String> = match question_ids {
        Some(ids) if !ids.is_empty() => ids.to_vec(),
        _ => numeric_question_ids(dataset, MIN_NUMERIC_RESPONSES, NumericOptions::default()),
    };

    let n = ids.len();
    if n == 0 {
        return CorrelationMatrix::empty();
    }

    let index = QuestionIndex::build(dataset);
    let variables: Vec<String> = ids.iter().map(|id| index.label(id).to_string()).collect();

    // Upper triangle
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "   Calculating correlations [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%)",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let coefficients: Vec<f64> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let (values1, values2) = align_by_respondent(
                &dataset.responses,
                &ids[i],
                &ids[j],
                NumericOptions::default(),
            );
            pb.inc(1);
            if values1.len() >= MIN_CORRELATION_PAIRS {
                safe_correlation(&values1, &values2)
            } else {
                0.0
            }
        })
        .collect();

    pb.finish_and_clear();

    let mut matrix = vec![vec![0.0; n]; n];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    for (&(i, j), &r) in pairs.iter().zip(&coefficients) {
        matrix[i][j] = r;
        matrix[j][i] = r;
    }

    tracing::debug!(questions = n, pairs = pairs.len(), "correlation matrix built");

    CorrelationMatrix {
        variables,
        question_ids: ids,
        matrix,
    }
}
