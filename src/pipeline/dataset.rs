//! Survey dataset model shared by every analysis step

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::LoadError;

/// Raw answer value. Numbers, booleans and strings arrive mixed in the same
/// question, so the value is kept as-is and coerced per computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl ResponseValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseValue::Number(n) => write!(f, "{}", n),
            ResponseValue::Bool(b) => write!(f, "{}", b),
            ResponseValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for ResponseValue {
    fn from(value: f64) -> Self {
        ResponseValue::Number(value)
    }
}

impl From<bool> for ResponseValue {
    fn from(value: bool) -> Self {
        ResponseValue::Bool(value)
    }
}

impl From<&str> for ResponseValue {
    fn from(value: &str) -> Self {
        ResponseValue::Text(value.to_string())
    }
}

/// Declared response type. A hint only: it is not guaranteed to be consistent
/// across the responses of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Likert,
    Numeric,
    Text,
    Boolean,
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseType::Likert => write!(f, "likert"),
            ResponseType::Numeric => write!(f, "numeric"),
            ResponseType::Text => write!(f, "text"),
            ResponseType::Boolean => write!(f, "boolean"),
        }
    }
}

/// One respondent's answer to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: String,
    pub respondent_id: String,
    pub question_id: String,
    pub question_label: String,
    pub value: ResponseValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub response_type: ResponseType,
}

impl SurveyResponse {
    /// Build a response with the conventional `{respondent}-{question}` id.
    pub fn new(
        respondent_id: impl Into<String>,
        question_id: impl Into<String>,
        question_label: impl Into<String>,
        value: impl Into<ResponseValue>,
        response_type: ResponseType,
    ) -> Self {
        let respondent_id = respondent_id.into();
        let question_id = question_id.into();
        Self {
            id: format!("{}-{}", respondent_id, question_id),
            respondent_id,
            question_id,
            question_label: question_label.into(),
            value: value.into(),
            category: None,
            response_type,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Where the responses came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Ocr,
    Excel,
    Mixed,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Ocr => write!(f, "ocr"),
            DataSource::Excel => write!(f, "excel"),
            DataSource::Mixed => write!(f, "mixed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub total_respondents: usize,
    pub collected_at: String,
    pub source: DataSource,
}

/// Immutable input to every analysis in this crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDataset {
    pub project_id: String,
    pub project_name: String,
    pub responses: Vec<SurveyResponse>,
    pub metadata: DatasetMetadata,
}

impl AnalysisDataset {
    /// Build a dataset stamped with the current time. The respondent count is
    /// the number of distinct respondent ids.
    pub fn from_responses(
        project_name: impl Into<String>,
        responses: Vec<SurveyResponse>,
        source: DataSource,
    ) -> Self {
        let mut seen = std::collections::HashSet::new();
        let total_respondents = responses
            .iter()
            .filter(|r| seen.insert(r.respondent_id.as_str()))
            .count();
        let project_name = project_name.into();
        Self {
            project_id: format!("{}-{}", source, Utc::now().timestamp_millis()),
            project_name,
            responses,
            metadata: DatasetMetadata {
                total_respondents,
                collected_at: Utc::now().to_rfc3339(),
                source,
            },
        }
    }

    /// Responses answering `question_id`, in dataset order
    pub fn responses_for<'a>(
        &'a self,
        question_id: &'a str,
    ) -> impl Iterator<Item = &'a SurveyResponse> + 'a {
        self.responses
            .iter()
            .filter(move |r| r.question_id == question_id)
    }
}

/// Merge several datasets into one.
///
/// Response and respondent ids are prefixed with `DS{index}-` so respondents
/// from different sources never align with each other.
pub fn merge_datasets(datasets: Vec<AnalysisDataset>) -> Result<AnalysisDataset, LoadError> {
    if datasets.is_empty() {
        return Err(LoadError::NothingToMerge);
    }
    if datasets.len() == 1 {
        return datasets.into_iter().next().ok_or(LoadError::NothingToMerge);
    }

    let project_name = datasets
        .iter()
        .map(|ds| ds.project_name.as_str())
        .collect::<Vec<_>>()
        .join(" + ");
    let total_respondents = datasets.iter().map(|ds| ds.metadata.total_respondents).sum();

    let responses: Vec<SurveyResponse> = datasets
        .into_iter()
        .enumerate()
        .flat_map(|(ds_index, ds)| {
            ds.responses.into_iter().map(move |response| SurveyResponse {
                id: format!("DS{}-{}", ds_index, response.id),
                respondent_id: format!("DS{}-{}", ds_index, response.respondent_id),
                ..response
            })
        })
        .collect();

    tracing::info!(
        responses = responses.len(),
        respondents = total_respondents,
        "merged datasets"
    );

    Ok(AnalysisDataset {
        project_id: format!("merged-{}", Utc::now().timestamp_millis()),
        project_name,
        responses,
        metadata: DatasetMetadata {
            total_respondents,
            collected_at: Utc::now().to_rfc3339(),
            source: DataSource::Mixed,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_dataset(name: &str) -> AnalysisDataset {
        AnalysisDataset::from_responses(
            name,
            vec![
                SurveyResponse::new("R1", "Q1", "Overall", 4.0, ResponseType::Numeric),
                SurveyResponse::new("R2", "Q1", "Overall", 5.0, ResponseType::Numeric),
            ],
            DataSource::Excel,
        )
    }

    #[test]
    fn test_response_value_json_shapes() {
        let values: Vec<ResponseValue> = serde_json::from_str(r#"[3, true, "만족"]"#).unwrap();
        assert_eq!(values[0], ResponseValue::Number(3.0));
        assert_eq!(values[1], ResponseValue::Bool(true));
        assert_eq!(values[2], ResponseValue::Text("만족".to_string()));
    }

    #[test]
    fn test_response_camel_case_roundtrip_fields() {
        let response = SurveyResponse::new("R1", "Q1", "Label", "yes", ResponseType::Boolean)
            .with_category("서비스 품질");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["respondentId"], "R1");
        assert_eq!(json["questionLabel"], "Label");
        assert_eq!(json["type"], "boolean");
        assert_eq!(json["id"], "R1-Q1");
    }

    #[test]
    fn test_number_display_drops_trailing_zero() {
        assert_eq!(ResponseValue::Number(3.0).to_string(), "3");
        assert_eq!(ResponseValue::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_from_responses_counts_distinct_respondents() {
        let ds = small_dataset("a");
        assert_eq!(ds.metadata.total_respondents, 2);
    }

    #[test]
    fn test_merge_prefixes_respondents() {
        let merged = merge_datasets(vec![small_dataset("a"), small_dataset("b")]).unwrap();
        assert_eq!(merged.project_name, "a + b");
        assert_eq!(merged.metadata.total_respondents, 4);
        assert_eq!(merged.metadata.source, DataSource::Mixed);
        assert_eq!(merged.responses[0].respondent_id, "DS0-R1");
        assert_eq!(merged.responses[2].respondent_id, "DS1-R1");
        assert_eq!(merged.responses[2].id, "DS1-R1-Q1");
    }

    #[test]
    fn test_merge_single_is_unchanged() {
        let ds = small_dataset("only");
        let merged = merge_datasets(vec![ds.clone()]).unwrap();
        assert_eq!(merged, ds);
    }

    #[test]
    fn test_merge_empty_errors() {
        assert!(matches!(
            merge_datasets(Vec::new()),
            Err(LoadError::NothingToMerge)
        ));
    }
}
