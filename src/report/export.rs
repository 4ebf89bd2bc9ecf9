//! Analysis report export: JSON report, per-question CSV and zip bundle

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    AnalysisConfig, AnalysisSummary, CorrelationMatrix, IpaResult, QuestionStats, TTestResult,
};

/// Metadata about the analysis run
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub likert_version: String,
    pub input_files: Vec<String>,
    pub project_name: String,
    pub settings: AnalysisConfig,
}

/// Complete analysis report. Analyses that were not run are omitted.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub summary: AnalysisSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_tests: Option<Vec<TTestResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa: Option<IpaResult>,
}

impl AnalysisReport {
    /// Start a report around the dataset summary
    pub fn new(summary: AnalysisSummary, input_files: &[PathBuf], settings: AnalysisConfig) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                likert_version: env!("CARGO_PKG_VERSION").to_string(),
                input_files: input_files
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
                project_name: summary.project_name.clone(),
                settings,
            },
            summary,
            correlation: None,
            t_tests: None,
            ipa: None,
        }
    }
}

/// Export the analysis report to a pretty-printed JSON file
pub fn export_analysis_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize analysis report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis report to {}", output_path.display()))?;

    tracing::info!(path = %output_path.display(), "analysis report written");
    Ok(())
}

fn format_stat(value: f64) -> String {
    format!("{:.4}", value)
}

/// Export one CSV row per question with its descriptive statistics.
///
/// Questions without numeric answers leave the statistic columns empty.
pub fn export_question_stats_csv(stats: &[QuestionStats], output_path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create CSV file: {}", output_path.display()))?;

    writeln!(
        file,
        "question_id,label,category,type,responses,count,mean,median,mode,min,max,std_dev"
    )?;

    for question in stats {
        let s = &question.stats;
        let numeric = |value: f64| {
            if s.count > 0 {
                format_stat(value)
            } else {
                String::new()
            }
        };
        let mode = s.mode.map(format_stat).unwrap_or_default();

        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            escape_csv_field(&question.question_id),
            escape_csv_field(&question.question_label),
            escape_csv_field(question.category.as_deref().unwrap_or("")),
            question.response_type,
            question.response_count,
            s.count,
            numeric(s.mean),
            numeric(s.median),
            mode,
            numeric(s.min),
            numeric(s.max),
            numeric(s.std_dev),
        )?;
    }

    Ok(())
}

/// Escape a field for CSV (handle commas, quotes and newlines)
pub fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Package report files into a zip archive and remove the originals.
pub fn package_reports(paths: &[&Path], zip_path: &Path) -> Result<()> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in paths {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid report file name: {}", path.display()))?;
        zip.start_file(filename, options)
            .with_context(|| format!("Failed to add {} to zip", filename))?;
        let mut content = Vec::new();
        std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    for path in paths {
        std::fs::remove_file(path).ok();
    }

    tracing::info!(path = %zip_path.display(), files = paths.len(), "report bundle written");
    Ok(())
}
