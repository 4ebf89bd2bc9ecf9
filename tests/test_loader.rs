//! Integration tests for loading survey tables and dataset JSON

use likert::cli::convert::write_dataset_json;
use likert::pipeline::{
    analyze_questions, extract_numeric_values, generate_paired_t_tests, load_dataset,
    merge_datasets, DataSource, InputEncoding, LoadOptions, NumericOptions, ResponseType,
    ResponseValue,
};

#[path = "common/mod.rs"]
mod common;

use common::{
    create_pre_post_dataset, create_survey_dataframe, create_temp_csv, create_temp_file,
    create_temp_parquet,
};

const SURVEY_CSV: &str = "\
응답자,[서비스] 직원 친절도,가격 만족도(사전),가격 만족도(사후),재방문 의사,기타 의견
김,매우 만족,3,4,예,주차 공간 부족
,만족,4,5,아니오,
박,보통,2,3,Y,직원 친절
최,4점,3,5,X,주차 요금
";

#[test]
fn test_load_wide_csv() {
    let (_dir, path) = create_temp_file("cafe.csv", SURVEY_CSV.as_bytes());
    let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();

    assert_eq!(dataset.project_name, "cafe");
    assert_eq!(dataset.metadata.source, DataSource::Excel);
    assert_eq!(dataset.metadata.total_respondents, 4);
    // 4 respondents x 5 questions, minus one blank comment
    assert_eq!(dataset.responses.len(), 19);

    let staff: Vec<_> = dataset.responses_for("Q1").collect();
    assert_eq!(staff[0].question_label, "[서비스] 직원 친절도");
    assert_eq!(staff[0].category.as_deref(), Some("서비스"));
    assert_eq!(staff[0].value, ResponseValue::Number(5.0));
    assert_eq!(staff[0].response_type, ResponseType::Likert);
    assert_eq!(staff[3].value, ResponseValue::Number(4.0));

    // Blank respondent cell falls back to the row number
    assert_eq!(staff[1].respondent_id, "R2");

    let revisit: Vec<_> = dataset.responses_for("Q4").collect();
    assert!(revisit.iter().all(|r| r.response_type == ResponseType::Boolean));
    assert_eq!(revisit[1].value, ResponseValue::Bool(false));

    let comments: Vec<_> = dataset.responses_for("Q5").collect();
    assert_eq!(comments.len(), 3);
    assert!(comments.iter().all(|r| r.response_type == ResponseType::Text));
}

#[test]
fn test_loaded_table_feeds_paired_tests() {
    let (_dir, path) = create_temp_file("cafe.csv", SURVEY_CSV.as_bytes());
    let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
    let results = generate_paired_t_tests(&dataset);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].question_a_label, "가격 만족도(사전)");
    assert_eq!(results[0].n, 4);
}

#[test]
fn test_unit_suffixed_cells_stay_numeric() {
    let csv = "응답자,평점,객단가\nA,4.5점,10000원\nB,3점,12000원\nC,5,8000\n";
    let (_dir, path) = create_temp_file("units.csv", csv.as_bytes());
    let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();

    let rating: Vec<_> = dataset.responses_for("Q1").collect();
    assert_eq!(rating[0].value, ResponseValue::Number(4.5));
    assert_eq!(rating[0].response_type, ResponseType::Numeric);
    assert_eq!(rating[1].response_type, ResponseType::Likert);

    assert_eq!(
        extract_numeric_values(&dataset.responses, "Q2", NumericOptions::default()),
        vec![10000.0, 12000.0, 8000.0]
    );

    let stats = analyze_questions(&dataset);
    let rating_stats = stats.iter().find(|s| s.question_id == "Q1").unwrap();
    assert_eq!(rating_stats.stats.count, 3);
}

#[test]
fn test_load_euc_kr_csv() {
    let (encoded, _, had_errors) = encoding_rs::EUC_KR.encode(SURVEY_CSV);
    assert!(!had_errors);
    let (_dir, path) = create_temp_file("legacy.csv", &encoded);

    let options = LoadOptions {
        encoding: InputEncoding::EucKr,
        ..LoadOptions::default()
    };
    let dataset = load_dataset(&path, &options).unwrap();

    assert_eq!(dataset.responses.len(), 19);
    let first = &dataset.responses[0];
    assert_eq!(first.question_label, "[서비스] 직원 친절도");
    assert_eq!(first.respondent_id, "김");
}

#[test]
fn test_respondent_column_option() {
    let (_dir, path) = create_temp_file("cafe.csv", SURVEY_CSV.as_bytes());
    let options = LoadOptions {
        respondent_column: Some("재방문 의사".to_string()),
        project_name: Some("카페 설문".to_string()),
        ..LoadOptions::default()
    };
    let dataset = load_dataset(&path, &options).unwrap();

    assert_eq!(dataset.project_name, "카페 설문");
    assert_eq!(dataset.responses[0].respondent_id, "예");
    // The original first column becomes a question
    assert_eq!(dataset.responses[0].question_label, "응답자");
}

#[test]
fn test_missing_respondent_column_fails() {
    let (_dir, path) = create_temp_file("cafe.csv", SURVEY_CSV.as_bytes());
    let options = LoadOptions {
        respondent_column: Some("respondent".to_string()),
        ..LoadOptions::default()
    };
    let err = load_dataset(&path, &options).unwrap_err();
    assert!(
        format!("{:#}", err).contains("'respondent' not found"),
        "unexpected error: {:#}",
        err
    );
}

#[test]
fn test_unsupported_extension() {
    let (_dir, path) = create_temp_file("survey.txt", b"a,b\n1,2\n");
    let err = load_dataset(&path, &LoadOptions::default()).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn test_load_csv_from_dataframe() {
    let mut df = create_survey_dataframe();
    let (_dir, path) = create_temp_csv(&mut df);
    let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();

    assert_eq!(dataset.metadata.total_respondents, 4);
    let pre: Vec<_> = dataset.responses_for("Q2").collect();
    assert_eq!(pre.len(), 4);
    assert_eq!(pre[0].value, ResponseValue::Number(3.0));
}

#[test]
fn test_load_parquet() {
    let mut df = create_survey_dataframe();
    let (_dir, path) = create_temp_parquet(&mut df);
    let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();

    assert_eq!(dataset.project_name, "survey");
    assert_eq!(dataset.responses.len(), 19);
    let pre: Vec<_> = dataset.responses_for("Q2").collect();
    assert_eq!(pre[0].response_type, ResponseType::Numeric);
}

#[test]
fn test_dataset_json_round_trip_and_merge() {
    let original = create_pre_post_dataset();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dataset.json");
    write_dataset_json(&original, &path).unwrap();

    let loaded = load_dataset(&path, &LoadOptions::default()).unwrap();
    assert_eq!(loaded, original);

    let merged = merge_datasets(vec![loaded, original]).unwrap();
    assert_eq!(merged.metadata.source, DataSource::Mixed);
    assert_eq!(merged.metadata.total_respondents, 6);
    // Respondents from different inputs never pair up
    assert_eq!(generate_paired_t_tests(&merged).len(), 1);
    assert_eq!(generate_paired_t_tests(&merged)[0].n, 6);
}
