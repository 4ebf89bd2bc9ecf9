//! Integration tests for descriptive statistics and the dataset summary

use likert::pipeline::{
    analyze_questions, calculate_basic_stats, frequency_distribution,
    generate_analysis_summary, merge_datasets, ResponseType, ResponseValue,
};

#[path = "common/mod.rs"]
mod common;

use common::{assert_close, create_mixed_dataset, create_pre_post_dataset, dataset_from, response};

// ============================================================================
// Basic statistics
// ============================================================================

#[test]
fn test_basic_stats_of_likert_answers() {
    let stats = calculate_basic_stats(&[1.0, 2.0, 2.0, 3.0, 4.0, 5.0]);

    assert_eq!(stats.count, 6);
    assert_close(stats.mean, 17.0 / 6.0, 1e-12);
    assert_close(stats.median, 2.5, 1e-12);
    assert_eq!(stats.mode, Some(2.0));
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 5.0);
    assert_close(stats.sum, 17.0, 1e-12);
    assert_close(stats.std_dev, stats.variance.sqrt(), 1e-12);
}

#[test]
fn test_basic_stats_single_and_empty() {
    let single = calculate_basic_stats(&[3.0]);
    assert_eq!(single.count, 1);
    assert_eq!(single.variance, 0.0, "one value has no sample variance");
    assert_eq!(single.std_dev, 0.0);

    let empty = calculate_basic_stats(&[]);
    assert_eq!(empty.count, 0);
    assert_eq!(empty.mean, 0.0);
    assert_eq!(empty.mode, None);
}

#[test]
fn test_frequency_distribution_keeps_raw_values() {
    let values: Vec<ResponseValue> = vec![
        "만족".into(),
        ResponseValue::Number(4.0),
        "만족".into(),
        ResponseValue::Number(2.0),
        ResponseValue::Bool(true),
    ];
    let distribution = frequency_distribution(&values);

    assert_eq!(distribution.len(), 4, "\"만족\" and 4 stay separate buckets");
    assert_eq!(distribution[0].value, ResponseValue::Number(2.0));
    assert_eq!(distribution[1].value, ResponseValue::Number(4.0));
    let text_bucket = distribution
        .iter()
        .find(|b| b.value == ResponseValue::Text("만족".to_string()))
        .unwrap();
    assert_eq!(text_bucket.count, 2);
    assert_close(text_bucket.percentage, 40.0, 1e-12);

    let total: f64 = distribution.iter().map(|b| b.percentage).sum();
    assert_close(total, 100.0, 1e-9);
}

#[test]
fn test_distribution_orders_numbers_before_text() {
    let values: Vec<ResponseValue> = vec![
        "-".into(),
        "3".into(),
        ResponseValue::Number(5.0),
        ResponseValue::Number(10.0),
        ResponseValue::Bool(false),
    ];
    let distribution = frequency_distribution(&values);

    assert_eq!(distribution[0].value, ResponseValue::Number(5.0));
    assert_eq!(distribution[1].value, ResponseValue::Number(10.0));
    assert!(distribution[2..]
        .iter()
        .all(|b| !matches!(b.value, ResponseValue::Number(_))));
}

// ============================================================================
// Per-question analysis and summary
// ============================================================================

#[test]
fn test_mixed_question_statistics() {
    let dataset = create_mixed_dataset();
    let stats = analyze_questions(&dataset);

    let overall = stats.iter().find(|s| s.question_id == "Q1").unwrap();
    assert_eq!(overall.response_count, 5);
    // "잘 모르겠음" is counted but not averaged
    assert_eq!(overall.stats.count, 4);
    assert_close(overall.stats.mean, 4.0, 1e-12);
    assert_eq!(overall.response_type, ResponseType::Likert);
    assert_eq!(overall.distribution.len(), 5);

    let comments = stats.iter().find(|s| s.question_id == "Q2").unwrap();
    assert_eq!(comments.stats.count, 0, "text answers are never coerced");
    assert_eq!(comments.response_type, ResponseType::Text);
}

#[test]
fn test_analysis_summary_overview() {
    let dataset = create_mixed_dataset();
    let summary = generate_analysis_summary(&dataset, 3);

    assert_eq!(summary.total_responses, 5);
    assert_eq!(summary.total_questions, 3);
    assert_eq!(summary.text_questions.len(), 1);

    let comments = &summary.text_questions[0];
    assert_eq!(comments.response_count, 3);
    assert_eq!(comments.top_keywords, vec!["직원", "응대", "친절"]);

    // Q1 contributes 5,4,3,4 and Q3 contributes 1,0,1
    assert_close(summary.overall_mean, 18.0 / 7.0, 1e-12);
}

#[test]
fn test_empty_dataset_summary() {
    let summary = generate_analysis_summary(&dataset_from(Vec::new()), 5);
    assert_eq!(summary.total_questions, 0);
    assert_eq!(summary.overall_mean, 0.0);
    assert!(summary.question_stats.is_empty());
}

#[test]
fn test_merged_respondents_stay_distinct() {
    let first = create_pre_post_dataset();
    let second = dataset_from(vec![response(
        "R1",
        "Q1",
        "만족도(사전)",
        2.0,
        ResponseType::Likert,
    )]);

    let merged = merge_datasets(vec![first, second]).unwrap();
    assert_eq!(merged.metadata.total_respondents, 4);
    assert_eq!(merged.responses.len(), 7);
    assert!(merged.responses.iter().any(|r| r.respondent_id == "DS1-R1"));
    assert!(merged.project_name.contains(" + "));
}
