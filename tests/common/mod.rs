//! Shared test utilities and fixture generators
#![allow(dead_code)]

use likert::pipeline::{
    AnalysisDataset, DataSource, ResponseType, ResponseValue, SurveyResponse,
};
use polars::prelude::*;
use rand::Rng;
use std::path::PathBuf;
use tempfile::TempDir;

/// Build a response for respondent `r` on question `q`
pub fn response(
    respondent: &str,
    question: &str,
    label: &str,
    value: impl Into<ResponseValue>,
    response_type: ResponseType,
) -> SurveyResponse {
    SurveyResponse::new(respondent, question, label, value, response_type)
}

/// Numeric Likert responses for one question, respondents `R1..Rn` in order
pub fn likert_column(question: &str, label: &str, values: &[f64]) -> Vec<SurveyResponse> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| response(&format!("R{}", i + 1), question, label, v, ResponseType::Likert))
        .collect()
}

/// Wrap responses into a dataset
pub fn dataset_from(responses: Vec<SurveyResponse>) -> AnalysisDataset {
    AnalysisDataset::from_responses("테스트 설문", responses, DataSource::Excel)
}

/// Satisfaction measured before and after a program, three respondents
pub fn create_pre_post_dataset() -> AnalysisDataset {
    let mut responses = likert_column("Q1", "만족도(사전)", &[3.0, 4.0, 5.0]);
    responses.extend(likert_column("Q2", "만족도(사후)", &[4.0, 5.0, 5.0]));
    dataset_from(responses)
}

/// Two stated importance/performance pairs, items A and B
pub fn create_stated_ipa_dataset() -> AnalysisDataset {
    let mut responses = Vec::new();
    responses.extend(likert_column("QA_I", "A 중요도", &[5.0, 5.0]));
    responses.extend(likert_column("QB_I", "B 중요도", &[2.0, 2.0]));
    responses.extend(likert_column("QA_P", "A 만족도", &[2.0, 2.0]));
    responses.extend(likert_column("QB_P", "B 만족도", &[5.0, 5.0]));
    dataset_from(responses)
}

/// Three plain numeric questions answered by five respondents, no IPA labels
pub fn create_derived_ipa_dataset() -> AnalysisDataset {
    let mut responses = Vec::new();
    responses.extend(likert_column("Q1", "청결", &[1.0, 2.0, 3.0, 4.0, 5.0]));
    responses.extend(likert_column("Q2", "가격", &[2.0, 2.0, 3.0, 5.0, 5.0]));
    responses.extend(likert_column("Q3", "접근성", &[5.0, 3.0, 4.0, 2.0, 1.0]));
    dataset_from(responses)
}

/// A question mixing Likert words, numbers, booleans and free text
pub fn create_mixed_dataset() -> AnalysisDataset {
    let label = "전반적 만족도";
    let mut responses = vec![
        response("R1", "Q1", label, "매우 만족", ResponseType::Likert),
        response("R2", "Q1", label, "만족", ResponseType::Likert),
        response("R3", "Q1", label, 3.0, ResponseType::Likert),
        response("R4", "Q1", label, "4점", ResponseType::Likert),
        response("R5", "Q1", label, "잘 모르겠음", ResponseType::Likert),
    ];
    responses.extend([
        response("R1", "Q2", "개선 의견", "직원 친절 응대 좋아요", ResponseType::Text),
        response("R2", "Q2", "개선 의견", "직원 응대 빠름", ResponseType::Text),
        response("R3", "Q2", "개선 의견", "주차 공간 부족", ResponseType::Text),
    ]);
    responses.extend([
        response("R1", "Q3", "재방문 의사", true, ResponseType::Boolean),
        response("R2", "Q3", "재방문 의사", false, ResponseType::Boolean),
        response("R3", "Q3", "재방문 의사", "yes", ResponseType::Boolean),
    ]);
    dataset_from(responses)
}

/// Random 1-5 answers for `questions` questions and `respondents` respondents
pub fn create_random_dataset(respondents: usize, questions: usize) -> AnalysisDataset {
    let mut rng = rand::thread_rng();
    let mut responses = Vec::with_capacity(respondents * questions);
    for q in 1..=questions {
        let label = format!("문항 {}", q);
        for r in 1..=respondents {
            let value = rng.gen_range(1..=5) as f64;
            responses.push(response(
                &format!("R{}", r),
                &format!("Q{}", q),
                &label,
                value,
                ResponseType::Likert,
            ));
        }
    }
    dataset_from(responses)
}

/// Wide survey table: respondent column plus one column per question
pub fn create_survey_dataframe() -> DataFrame {
    df! {
        "응답자" => ["김", "이", "박", "최"],
        "[서비스] 직원 친절도" => ["매우 만족", "만족", "보통", "4점"],
        "가격 만족도(사전)" => [3i64, 4, 2, 3],
        "가격 만족도(사후)" => [4i64, 5, 3, 5],
        "재방문 의사" => ["예", "아니오", "Y", "X"],
        "기타 의견" => ["주차 공간 부족", "", "직원 친절", "주차 요금"],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("survey.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with raw file contents under `name`
pub fn create_temp_file(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("survey.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {} ± {}, got {}",
        expected,
        tol,
        actual
    );
}
