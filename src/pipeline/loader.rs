//! Dataset loader for wide survey tables (CSV, Parquet) and dataset JSON

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use polars::prelude::*;
use regex::Regex;

use super::dataset::{AnalysisDataset, DataSource, ResponseType, ResponseValue, SurveyResponse};
use super::error::LoadError;

/// Default number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10000;

/// Exact cell vocabulary recognized as a Likert answer
const LIKERT_VOCABULARY: &[(&str, f64)] = &[
    ("매우 불만족", 1.0),
    ("매우불만족", 1.0),
    ("1점", 1.0),
    ("1", 1.0),
    ("불만족", 2.0),
    ("2점", 2.0),
    ("2", 2.0),
    ("보통", 3.0),
    ("3점", 3.0),
    ("3", 3.0),
    ("만족", 4.0),
    ("4점", 4.0),
    ("4", 4.0),
    ("매우 만족", 5.0),
    ("매우만족", 5.0),
    ("5점", 5.0),
    ("5", 5.0),
];

/// Checkbox cells read as `true` (compared uppercase)
const CHECKBOX_TRUE: &[&str] = &["예", "O", "Y", "YES", "TRUE"];

/// Checkbox cells read as `false` (compared uppercase)
const CHECKBOX_FALSE: &[&str] = &["아니오", "X", "N", "NO", "FALSE"];

/// Category name and the label keywords that select it
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("서비스 품질", &["서비스", "품질", "service"]),
    ("가격 만족도", &["가격", "비용", "요금", "price"]),
    ("직원 친절", &["직원", "친절", "응대", "staff"]),
    ("시설 환경", &["시설", "환경", "청결", "인테리어"]),
];

/// Leading number of a cell such as "4.5점" or "10000원"
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("valid leading number pattern")
});

/// First non-empty `[...]` segment of a label
static BRACKET_CATEGORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid category pattern"));

/// Text encoding of CSV input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputEncoding {
    #[default]
    Utf8,
    /// EUC-KR / CP949, common in Korean spreadsheet exports
    EucKr,
}

impl fmt::Display for InputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEncoding::Utf8 => write!(f, "utf-8"),
            InputEncoding::EucKr => write!(f, "euc-kr"),
        }
    }
}

impl FromStr for InputEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(InputEncoding::Utf8),
            "euc-kr" | "euckr" | "cp949" => Ok(InputEncoding::EucKr),
            other => Err(format!(
                "unknown encoding '{}' (expected utf-8 or euc-kr)",
                other
            )),
        }
    }
}

/// Options controlling how an input file becomes a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Project name; defaults to the file stem
    pub project_name: Option<String>,
    /// Column holding respondent ids; defaults to the first column
    pub respondent_column: Option<String>,
    pub encoding: InputEncoding,
    /// Rows used for CSV schema inference (0 = full scan)
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            project_name: None,
            respondent_column: None,
            encoding: InputEncoding::Utf8,
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset, dispatching on the file extension (csv, parquet, json).
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<AnalysisDataset> {
    let extension = file_extension(path);

    let dataset = match extension.as_str() {
        "csv" | "parquet" => {
            let df = read_table(path, options)?;
            let project_name = options.project_name.clone().unwrap_or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("survey")
                    .to_string()
            });
            dataframe_to_dataset(&df, &project_name, options.respondent_column.as_deref())
                .with_context(|| format!("Failed to read survey table: {}", path.display()))?
        }
        "json" => {
            let mut dataset = load_dataset_json(path)?;
            if let Some(name) = &options.project_name {
                dataset.project_name = name.clone();
            }
            dataset
        }
        _ => return Err(LoadError::UnsupportedFormat { extension }.into()),
    };

    tracing::info!(
        path = %path.display(),
        responses = dataset.responses.len(),
        respondents = dataset.metadata.total_respondents,
        "dataset loaded"
    );
    Ok(dataset)
}

/// Read a wide CSV or Parquet table into a DataFrame.
pub fn read_table(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    // 0 means full scan
    let schema_length = if options.infer_schema_length == 0 {
        None
    } else {
        Some(options.infer_schema_length)
    };

    let df = match file_extension(path).as_str() {
        "csv" => match options.encoding {
            InputEncoding::Utf8 => LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .finish()
                .and_then(|lf| lf.collect())
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
            InputEncoding::EucKr => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("Failed to read file: {}", path.display()))?;
                let text = decode_euc_kr(&bytes, path)?;
                CsvReadOptions::default()
                    .with_has_header(true)
                    .with_infer_schema_length(schema_length)
                    .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
                    .finish()
                    .with_context(|| format!("Failed to parse CSV file: {}", path.display()))?
            }
        },
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .and_then(|lf| lf.collect())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                extension: other.to_string(),
            }
            .into())
        }
    };

    tracing::debug!(rows = df.height(), columns = df.width(), "table read");
    Ok(df)
}

fn decode_euc_kr<'a>(bytes: &'a [u8], path: &Path) -> Result<Cow<'a, str>, LoadError> {
    encoding_rs::EUC_KR
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| LoadError::Encoding {
            path: path.display().to_string(),
            encoding: InputEncoding::EucKr.to_string(),
        })
}

/// Load a JSON-serialized `AnalysisDataset`.
pub fn load_dataset_json(path: &Path) -> Result<AnalysisDataset> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse dataset JSON: {}", path.display()))
}

/// Text form of a cell, `None` for nulls
fn cell_text(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}

/// Classify a string cell. Empty cells yield `None`.
pub fn classify_text_cell(raw: &str) -> Option<(ResponseValue, ResponseType)> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(&(_, score)) = LIKERT_VOCABULARY.iter().find(|(word, _)| *word == text) {
        return Some((ResponseValue::Number(score), ResponseType::Likert));
    }

    if let Some(number) = leading_number(text) {
        return Some((ResponseValue::Number(number), ResponseType::Numeric));
    }

    let upper = text.to_uppercase();
    if CHECKBOX_TRUE.contains(&upper.as_str()) {
        return Some((ResponseValue::Bool(true), ResponseType::Boolean));
    }
    if CHECKBOX_FALSE.contains(&upper.as_str()) {
        return Some((ResponseValue::Bool(false), ResponseType::Boolean));
    }

    Some((ResponseValue::Text(text.to_string()), ResponseType::Text))
}

/// Number at the start of `text`, ignoring any unit suffix
fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Classify a raw table cell. Nulls and blank strings yield `None`.
pub fn classify_cell(value: &AnyValue) -> Option<(ResponseValue, ResponseType)> {
    match value {
        AnyValue::Null => None,
        AnyValue::Boolean(b) => Some((ResponseValue::Bool(*b), ResponseType::Boolean)),
        AnyValue::String(s) => classify_text_cell(s),
        AnyValue::StringOwned(s) => classify_text_cell(s),
        AnyValue::Int8(_)
        | AnyValue::Int16(_)
        | AnyValue::Int32(_)
        | AnyValue::Int64(_)
        | AnyValue::UInt8(_)
        | AnyValue::UInt16(_)
        | AnyValue::UInt32(_)
        | AnyValue::UInt64(_)
        | AnyValue::Float32(_)
        | AnyValue::Float64(_) => value
            .extract::<f64>()
            .filter(|n| n.is_finite())
            .map(|n| (ResponseValue::Number(n), ResponseType::Numeric)),
        other => classify_text_cell(&other.to_string()),
    }
}

/// Category from a question label: the first `[...]` segment, else the
/// first matching keyword group.
pub fn extract_category(label: &str) -> Option<String> {
    if let Some(captures) = BRACKET_CATEGORY.captures(label) {
        return Some(captures[1].to_string());
    }

    let lower = label.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| category.to_string())
}

/// Convert a wide table (one row per respondent, one column per question)
/// into a dataset.
pub fn dataframe_to_dataset(
    df: &DataFrame,
    project_name: &str,
    respondent_column: Option<&str>,
) -> Result<AnalysisDataset> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let respondent_index = match respondent_column {
        Some(name) => column_names
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| LoadError::MissingRespondentColumn {
                column: name.to_string(),
                available: column_names.clone(),
            })?,
        None => 0,
    };

    if df.height() == 0 || column_names.len() < 2 {
        return Err(LoadError::EmptyTable {
            path: project_name.to_string(),
        }
        .into());
    }

    let columns = df.get_columns();
    let respondents: Vec<String> = columns[respondent_index]
        .as_materialized_series()
        .iter()
        .enumerate()
        .map(|(row, value)| {
            cell_text(&value)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("R{}", row + 1))
        })
        .collect();

    let mut responses = Vec::new();
    let mut skipped = 0usize;
    let question_columns = columns
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != respondent_index)
        .map(|(_, column)| column);

    for (position, column) in question_columns.enumerate() {
        let question_id = format!("Q{}", position + 1);
        let label = column.name().to_string();
        let category = extract_category(&label);

        for (row, value) in column.as_materialized_series().iter().enumerate() {
            let Some((value, response_type)) = classify_cell(&value) else {
                skipped += 1;
                continue;
            };
            let mut response = SurveyResponse::new(
                respondents[row].as_str(),
                question_id.as_str(),
                label.as_str(),
                value,
                response_type,
            );
            response.category = category.clone();
            responses.push(response);
        }
    }

    tracing::debug!(skipped, "empty cells skipped");

    let mut dataset = AnalysisDataset::from_responses(project_name, responses, DataSource::Excel);
    dataset.metadata.total_respondents = df.height();
    Ok(dataset)
}
