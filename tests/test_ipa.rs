//! Integration tests for importance-performance analysis

use likert::pipeline::{
    detect_ipa_role, generate_ipa, perform_derived_ipa, perform_ipa, AnalysisError, IpaMethod,
    IpaRole, Quadrant,
};

#[path = "common/mod.rs"]
mod common;

use common::{
    assert_close, create_derived_ipa_dataset, create_random_dataset, create_stated_ipa_dataset,
    dataset_from, likert_column,
};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_stated_ipa_scenario() {
    let dataset = create_stated_ipa_dataset();
    let result = perform_ipa(&dataset, &ids(&["QA_I", "QB_I"]), &ids(&["QA_P", "QB_P"])).unwrap();

    assert_eq!(result.method, IpaMethod::Stated);
    assert_close(result.importance_mean, 3.5, 1e-12);
    assert_close(result.performance_mean, 3.5, 1e-12);

    let a = &result.items[0];
    assert_eq!(a.question_id, "QA_P");
    assert_eq!(a.label, "A 만족도");
    assert_eq!(a.quadrant, Quadrant::ConcentrateHere);
    assert_eq!(a.quadrant.number(), 2);

    let b = &result.items[1];
    assert_eq!(b.quadrant, Quadrant::PossibleOverkill);
    assert_eq!(b.quadrant.number(), 4);
}

#[test]
fn test_generate_ipa_detects_stated_pairs() {
    let dataset = create_stated_ipa_dataset();
    let result = generate_ipa(&dataset).unwrap();

    assert_eq!(result.method, IpaMethod::Stated);
    assert_eq!(result.items.len(), 2);
    let a = result.items.iter().find(|i| i.question_id == "QA_P").unwrap();
    assert_eq!(a.importance, 5.0);
    assert_eq!(a.performance, 2.0);
    assert_eq!(a.quadrant, Quadrant::ConcentrateHere);
}

#[test]
fn test_mismatched_question_lists_fail() {
    let dataset = create_stated_ipa_dataset();
    let err = perform_ipa(&dataset, &ids(&["QA_I"]), &ids(&["QA_P", "QB_P"])).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::MismatchedIpaQuestions {
            importance: 1,
            performance: 2
        }
    );
}

#[test]
fn test_missing_side_scores_zero() {
    let dataset = create_stated_ipa_dataset();
    let result = perform_ipa(&dataset, &ids(&["NOPE"]), &ids(&["QA_P"])).unwrap();
    assert_eq!(result.items[0].importance, 0.0);
    assert_eq!(result.items[0].performance, 2.0);
}

#[test]
fn test_derived_ipa_importance_range() {
    let dataset = create_derived_ipa_dataset();
    let result = generate_ipa(&dataset).unwrap();

    assert_eq!(result.method, IpaMethod::Derived);
    assert_eq!(result.items.len(), 3);
    for item in &result.items {
        assert!(
            (1.0..=5.0).contains(&item.importance),
            "importance {} out of range for {}",
            item.importance,
            item.question_id
        );
    }

    let cleanliness = result.items.iter().find(|i| i.question_id == "Q1").unwrap();
    assert_close(cleanliness.performance, 3.0, 1e-12);
}

#[test]
fn test_derived_ipa_on_random_answers() {
    let result = perform_derived_ipa(&create_random_dataset(30, 5));
    assert_eq!(result.items.len(), 5);
    assert!(result
        .items
        .iter()
        .all(|i| (1.0..=5.0).contains(&i.importance) && (1.0..=5.0).contains(&i.performance)));
}

#[test]
fn test_derived_ipa_with_few_respondents_defaults_importance() {
    let mut responses = likert_column("Q1", "청결", &[4.0, 5.0]);
    responses.extend(likert_column("Q2", "가격", &[2.0, 3.0]));
    let result = perform_derived_ipa(&dataset_from(responses));

    assert!(result.items.iter().all(|i| i.importance == 1.0));
    // Equal importance sits on the mean, so it counts as high
    let price = result.items.iter().find(|i| i.question_id == "Q2").unwrap();
    assert_eq!(price.quadrant, Quadrant::ConcentrateHere);
}

#[test]
fn test_quadrant_serializes_as_number() {
    let json = serde_json::to_string(&Quadrant::LowPriority).unwrap();
    assert_eq!(json, "3");
    assert_eq!(Quadrant::classify(4.0, 4.0, 3.0, 3.0), Quadrant::KeepUp);
}

#[test]
fn test_role_detection() {
    assert_eq!(detect_ipa_role("[시설] 청결 중요도"), Some(IpaRole::Importance));
    assert_eq!(detect_ipa_role("Staff satisfaction"), Some(IpaRole::Performance));
    assert_eq!(detect_ipa_role("중요도 대비 만족도"), None);
    assert_eq!(detect_ipa_role("재방문 의사"), None);
}

#[test]
fn test_bare_role_labels_fall_back_to_derived() {
    let mut responses = likert_column("Q1", "중요도", &[5.0, 4.0, 5.0]);
    responses.extend(likert_column("Q2", "만족도", &[3.0, 4.0, 2.0]));
    let result = generate_ipa(&dataset_from(responses)).unwrap();

    assert_eq!(result.method, IpaMethod::Derived);
    assert_eq!(result.items.len(), 2);
}
