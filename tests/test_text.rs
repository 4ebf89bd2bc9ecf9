//! Integration tests for free-text summaries

use likert::pipeline::{
    extract_top_keywords, summarize_text_questions, summarize_text_responses, ResponseType,
    DEFAULT_KEYWORD_LIMIT,
};

#[path = "common/mod.rs"]
mod common;

use common::{assert_close, create_mixed_dataset, dataset_from, response};

#[test]
fn test_keywords_mix_korean_and_english() {
    let values = [
        "주차 공간 부족, parking!",
        "주차 요금 비쌈",
        "Parking 2시간 무료였으면",
    ];
    let keywords = extract_top_keywords(&values, DEFAULT_KEYWORD_LIMIT);

    assert_eq!(keywords[0], "주차");
    assert_eq!(keywords[1], "parking");
    assert_eq!(keywords.len(), 5);
}

#[test]
fn test_keywords_drop_noise_tokens() {
    let values = ["the 1 a 2024 ok x", "snake_case and _ __"];
    let keywords = extract_top_keywords(&values, 10);
    assert_eq!(keywords, vec!["snake", "case"]);
}

#[test]
fn test_keyword_ties_keep_first_occurrence() {
    let values = ["beta alpha", "alpha beta gamma"];
    assert_eq!(extract_top_keywords(&values, 3), vec!["beta", "alpha", "gamma"]);
}

#[test]
fn test_text_summary_ignores_non_strings() {
    let responses = vec![
        response("R1", "Q1", "의견", "  좋아요  ", ResponseType::Text),
        response("R2", "Q1", "의견", 5.0, ResponseType::Text),
        response("R3", "Q1", "의견", "", ResponseType::Text),
        response("R4", "Q1", "의견", "친절함", ResponseType::Text),
    ];
    let summary = summarize_text_responses("Q1", "의견", &responses, 5);

    assert_eq!(summary.response_count, 2);
    assert_close(summary.average_length, 3.0, 1e-12);
    assert_eq!(summary.top_keywords, vec!["좋아요", "친절함"]);
}

#[test]
fn test_text_questions_from_dataset() {
    let summaries = summarize_text_questions(&create_mixed_dataset(), 2);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].question_label, "개선 의견");
    assert_eq!(summaries[0].top_keywords, vec!["직원", "응대"]);

    let empty = summarize_text_questions(&dataset_from(Vec::new()), 2);
    assert!(empty.is_empty());
}
