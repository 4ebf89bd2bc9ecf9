//! Importance-performance analysis (IPA)
//!
//! Stated mode pairs explicit importance and performance questions by label.
//! When no such pair exists, derived mode estimates importance from how
//! strongly each question tracks the respondent's other answers.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use super::coerce::coerce_numeric;
use super::correlation::{safe_correlation, MIN_CORRELATION_PAIRS};
use super::dataset::AnalysisDataset;
use super::descriptive::mean;
use super::error::AnalysisError;
use super::pairing::{detect_ipa_role, detect_pairs, ipa_key};
use super::questions::{extract_numeric_values, numeric_question_ids, NumericOptions, QuestionIndex};

/// IPA quadrant, serialized as its number (1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// High importance, high performance
    KeepUp,
    /// High importance, low performance
    ConcentrateHere,
    /// Low importance, low performance
    LowPriority,
    /// Low importance, high performance
    PossibleOverkill,
}

impl Quadrant {
    /// Classify against the item means. Ties lean to the high side.
    pub fn classify(
        importance: f64,
        performance: f64,
        importance_mean: f64,
        performance_mean: f64,
    ) -> Self {
        let high_importance = importance >= importance_mean;
        let high_performance = performance >= performance_mean;
        match (high_importance, high_performance) {
            (true, true) => Quadrant::KeepUp,
            (true, false) => Quadrant::ConcentrateHere,
            (false, false) => Quadrant::LowPriority,
            (false, true) => Quadrant::PossibleOverkill,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Quadrant::KeepUp => 1,
            Quadrant::ConcentrateHere => 2,
            Quadrant::LowPriority => 3,
            Quadrant::PossibleOverkill => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quadrant::KeepUp => "keep up",
            Quadrant::ConcentrateHere => "concentrate here",
            Quadrant::LowPriority => "low priority",
            Quadrant::PossibleOverkill => "possible overkill",
        }
    }
}

impl Serialize for Quadrant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{} {}", self.number(), self.name())
    }
}

/// How importance was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IpaMethod {
    Stated,
    Derived,
}

impl std::fmt::Display for IpaMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpaMethod::Stated => write!(f, "stated"),
            IpaMethod::Derived => write!(f, "derived"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpaItem {
    pub question_id: String,
    pub label: String,
    pub importance: f64,
    pub performance: f64,
    pub quadrant: Quadrant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpaResult {
    pub items: Vec<IpaItem>,
    pub importance_mean: f64,
    pub performance_mean: f64,
    pub method: IpaMethod,
}

/// Item before quadrant assignment
struct ScoredItem {
    question_id: String,
    label: String,
    importance: f64,
    performance: f64,
}

fn classify_items(scored: Vec<ScoredItem>, method: IpaMethod) -> IpaResult {
    let importances: Vec<f64> = scored.iter().map(|s| s.importance).collect();
    let performances: Vec<f64> = scored.iter().map(|s| s.performance).collect();
    let importance_mean = mean(&importances).unwrap_or(0.0);
    let performance_mean = mean(&performances).unwrap_or(0.0);

    let items = scored
        .into_iter()
        .map(|s| IpaItem {
            quadrant: Quadrant::classify(
                s.importance,
                s.performance,
                importance_mean,
                performance_mean,
            ),
            question_id: s.question_id,
            label: s.label,
            importance: s.importance,
            performance: s.performance,
        })
        .collect();

    IpaResult {
        items,
        importance_mean,
        performance_mean,
        method,
    }
}

/// Stated-mode IPA over positional importance/performance question pairs.
///
/// Each side's score is the mean of every numeric answer to that question,
/// not aligned by respondent. A side with no numeric answers scores 0.
pub fn perform_ipa(
    dataset: &AnalysisDataset,
    importance_ids: &[String],
    performance_ids: &[String],
) -> Result<IpaResult, AnalysisError> {
    if importance_ids.len() != performance_ids.len() {
        return Err(AnalysisError::MismatchedIpaQuestions {
            importance: importance_ids.len(),
            performance: performance_ids.len(),
        });
    }

    let index = QuestionIndex::build(dataset);
    let options = NumericOptions::default();
    let scored = importance_ids
        .iter()
        .zip(performance_ids)
        .map(|(importance_id, performance_id)| {
            let importance =
                extract_numeric_values(&dataset.responses, importance_id, options);
            let performance =
                extract_numeric_values(&dataset.responses, performance_id, options);
            ScoredItem {
                question_id: performance_id.clone(),
                label: index.label(performance_id).to_string(),
                importance: mean(&importance).unwrap_or(0.0),
                performance: mean(&performance).unwrap_or(0.0),
            }
        })
        .collect();

    Ok(classify_items(scored, IpaMethod::Stated))
}

/// Derived-mode IPA over every numeric question.
///
/// Importance is `1 + 4·|r|`, where `r` correlates a question's answers with
/// the same respondents' mean answer to all other questions. Questions with
/// fewer than three usable respondents get importance 1.
pub fn perform_derived_ipa(dataset: &AnalysisDataset) -> IpaResult {
    let options = NumericOptions::default();
    let question_ids = numeric_question_ids(dataset, 1, options);
    let index = QuestionIndex::build(dataset);

    // Per-respondent (sum, count) over every numeric answer
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    let mut answers: HashMap<&str, Vec<(&str, f64)>> = HashMap::new();
    for response in &dataset.responses {
        if !options.admits(response) {
            continue;
        }
        let Some(value) = coerce_numeric(&response.value) else {
            continue;
        };
        let entry = totals.entry(response.respondent_id.as_str()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
        answers
            .entry(response.question_id.as_str())
            .or_default()
            .push((response.respondent_id.as_str(), value));
    }

    let scored = question_ids
        .iter()
        .map(|question_id| {
            let own = answers
                .get(question_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let own_values: Vec<f64> = own.iter().map(|&(_, value)| value).collect();
            let performance = mean(&own_values).unwrap_or(0.0);

            let (values, other_means): (Vec<f64>, Vec<f64>) = own
                .iter()
                .filter_map(|&(respondent, value)| {
                    let &(sum, count) = totals.get(respondent)?;
                    (count >= 2).then(|| (value, (sum - value) / (count - 1) as f64))
                })
                .unzip();

            let importance = if values.len() >= MIN_CORRELATION_PAIRS {
                1.0 + 4.0 * safe_correlation(&values, &other_means).abs().clamp(0.0, 1.0)
            } else {
                1.0
            };

            ScoredItem {
                question_id: question_id.clone(),
                label: index.label(question_id).to_string(),
                importance,
                performance,
            }
        })
        .collect();

    classify_items(scored, IpaMethod::Derived)
}

/// Run stated-mode IPA on label-detected pairs, falling back to derived mode
/// when no pair is found.
pub fn generate_ipa(dataset: &AnalysisDataset) -> Result<IpaResult, AnalysisError> {
    let index = QuestionIndex::build(dataset);
    let pairs = detect_pairs(&index, detect_ipa_role, ipa_key);

    if pairs.is_empty() {
        tracing::debug!("no importance/performance pairs, using derived importance");
        return Ok(perform_derived_ipa(dataset));
    }

    let (importance_ids, performance_ids): (Vec<String>, Vec<String>) = pairs
        .into_iter()
        .map(|pair| (pair.first, pair.second))
        .unzip();
    perform_ipa(dataset, &importance_ids, &performance_ids)
}
