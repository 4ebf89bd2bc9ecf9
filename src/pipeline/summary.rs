//! Dataset-level overview combining per-question and text results

use serde::Serialize;

use super::coerce::coerce_numeric;
use super::dataset::{AnalysisDataset, DataSource, ResponseType};
use super::descriptive::{analyze_questions, mean, QuestionStats};
use super::questions::QuestionIndex;
use super::text::{summarize_text_responses, TextQuestionSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub project_name: String,
    pub total_responses: usize,
    pub total_questions: usize,
    pub data_source: DataSource,
    pub collected_at: String,
    pub question_stats: Vec<QuestionStats>,
    pub text_questions: Vec<TextQuestionSummary>,
    pub overall_mean: f64,
}

/// Summaries for every question whose dominant type is text, most answered
/// first.
pub fn summarize_text_questions(
    dataset: &AnalysisDataset,
    keyword_limit: usize,
) -> Vec<TextQuestionSummary> {
    let index = QuestionIndex::build(dataset);
    let mut summaries: Vec<TextQuestionSummary> = index
        .iter()
        .filter(|(_, meta)| meta.dominant_type == ResponseType::Text)
        .map(|(question_id, meta)| {
            summarize_text_responses(
                question_id,
                &meta.label,
                dataset.responses_for(question_id),
                keyword_limit,
            )
        })
        .collect();
    summaries.sort_by(|a, b| b.response_count.cmp(&a.response_count));
    summaries
}

/// Build the dataset overview.
///
/// `total_responses` reports the respondent count from the dataset metadata.
/// `overall_mean` averages every coercible value of non-text responses.
pub fn generate_analysis_summary(dataset: &AnalysisDataset, keyword_limit: usize) -> AnalysisSummary {
    let question_stats = analyze_questions(dataset);

    let numeric: Vec<f64> = dataset
        .responses
        .iter()
        .filter(|r| r.response_type != ResponseType::Text)
        .filter_map(|r| coerce_numeric(&r.value))
        .collect();

    AnalysisSummary {
        project_name: dataset.project_name.clone(),
        total_responses: dataset.metadata.total_respondents,
        total_questions: question_stats.len(),
        data_source: dataset.metadata.source,
        collected_at: dataset.metadata.collected_at.clone(),
        text_questions: summarize_text_questions(dataset, keyword_limit),
        question_stats,
        overall_mean: mean(&numeric).unwrap_or(0.0),
    }
}
