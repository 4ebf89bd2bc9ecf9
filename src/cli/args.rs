//! Command-line argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{AnalysisConfig, AnalysisSet, InputEncoding, LoadOptions};

/// Likert - Statistical analysis of survey responses
#[derive(Parser, Debug)]
#[command(name = "likert")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV, Parquet or dataset JSON).
    /// Repeat to merge several inputs into one dataset.
    #[arg(short, long = "input")]
    pub inputs: Vec<PathBuf>,

    /// Report JSON path.
    /// Defaults to the first input's directory with an '_analysis' suffix
    /// (e.g., survey.csv → survey_analysis.json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Project name shown in the report. Defaults to the input file name.
    #[arg(long)]
    pub project_name: Option<String>,

    /// Column holding respondent ids in wide tables. Defaults to the first column.
    #[arg(long)]
    pub respondent_column: Option<String>,

    /// Text encoding of CSV input: "utf-8" or "euc-kr" (CP949 exports)
    #[arg(long, default_value = "utf-8", value_parser = parse_encoding)]
    pub encoding: InputEncoding,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Analyses to run (comma-separated): basic, correlation, ttest, ipa, text
    #[arg(long, default_value = "all", value_parser = parse_analyses)]
    pub analyses: AnalysisSet,

    /// Number of keywords reported per free-text question
    #[arg(long = "keywords", default_value = "5", value_parser = validate_keyword_limit)]
    pub keyword_limit: usize,

    /// Minimum |r| for a question pair to be listed on the console
    #[arg(long, default_value = "0.4", value_parser = validate_min_correlation)]
    pub min_correlation: f64,

    /// Package the report files into a zip archive
    #[arg(long, default_value = "false")]
    pub bundle: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Increase diagnostic output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print progress, not the result tables
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a wide survey table (CSV or Parquet) to dataset JSON
    Convert {
        /// Input file path (CSV or Parquet)
        input: PathBuf,

        /// Output file path (optional, defaults to input with .json extension)
        output: Option<PathBuf>,

        /// Project name stored in the dataset
        #[arg(long)]
        project_name: Option<String>,

        /// Column holding respondent ids. Defaults to the first column.
        #[arg(long)]
        respondent_column: Option<String>,

        /// Text encoding of CSV input: "utf-8" or "euc-kr"
        #[arg(long, default_value = "utf-8", value_parser = parse_encoding)]
        encoding: InputEncoding,

        /// Number of rows to use for schema inference. Use 0 for full table scan.
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

impl Cli {
    /// Primary input: the first `--input`
    pub fn input(&self) -> Option<&PathBuf> {
        self.inputs.first()
    }

    /// Report path, deriving from the first input if not explicitly provided.
    pub fn output_path(&self) -> Option<PathBuf> {
        let input = self.input()?;
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| sibling_path(input, "_analysis.json")),
        )
    }

    /// Per-question CSV path, next to the report
    pub fn csv_path(&self) -> Option<PathBuf> {
        self.output_path()
            .map(|output| sibling_path(&output, "_questions.csv"))
    }

    /// Zip bundle path, next to the report
    pub fn bundle_path(&self) -> Option<PathBuf> {
        self.output_path().map(|output| sibling_path(&output, ".zip"))
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            project_name: self.project_name.clone(),
            respondent_column: self.respondent_column.clone(),
            encoding: self.encoding,
            infer_schema_length: self.infer_schema_length,
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            analyses: self.analyses.clone(),
            keyword_limit: self.keyword_limit,
            min_correlation: self.min_correlation,
        }
    }
}

/// `dir/stem{suffix}` for a path `dir/stem.ext`
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("survey");
    parent.join(format!("{}{}", stem, suffix))
}

fn parse_encoding(s: &str) -> Result<InputEncoding, String> {
    s.parse()
}

fn parse_analyses(s: &str) -> Result<AnalysisSet, String> {
    s.parse()
}

/// Validator for the keyword count
fn validate_keyword_limit(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 0 {
        Err("keywords must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for min_correlation parameter
fn validate_min_correlation(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "min_correlation must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
