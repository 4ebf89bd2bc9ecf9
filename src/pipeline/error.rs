//! Error types for the analysis engine and dataset loader.
//!
//! Messy survey data never produces an error: uncoercible values are excluded
//! and undersized samples yield neutral results. The variants here cover caller
//! mistakes and unreadable inputs only.

use thiserror::Error;

/// Errors raised by the analysis core.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Stated-mode IPA was invoked with importance and performance question
    /// lists of different lengths. Pairs are positional, so this is a broken
    /// invariant on the caller side.
    #[error(
        "Importance and performance question counts must match (importance: {importance}, performance: {performance})"
    )]
    MismatchedIpaQuestions {
        importance: usize,
        performance: usize,
    },
}

/// Errors raised while turning an input file into an `AnalysisDataset`.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File extension is not one of the supported input formats.
    #[error("Unsupported file format: '{extension}'. Supported formats: csv, parquet, json")]
    UnsupportedFormat { extension: String },

    /// The requested respondent id column does not exist.
    #[error("Respondent column '{column}' not found. Available columns: {available:?}")]
    MissingRespondentColumn {
        column: String,
        available: Vec<String>,
    },

    /// The table has a header but no respondent rows, or no question columns.
    #[error("Survey table '{path}' does not contain enough data (need a header, at least one question column and one row)")]
    EmptyTable { path: String },

    /// Input bytes could not be decoded with the requested encoding.
    #[error("Failed to decode '{path}' as {encoding}: malformed byte sequence")]
    Encoding { path: String, encoding: String },

    /// `merge_datasets` was called with nothing to merge.
    #[error("No datasets to merge")]
    NothingToMerge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_ipa_message_names_counts() {
        let err = AnalysisError::MismatchedIpaQuestions {
            importance: 3,
            performance: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("importance: 3"));
        assert!(msg.contains("performance: 2"));
    }

    #[test]
    fn test_unsupported_format_lists_supported() {
        let err = LoadError::UnsupportedFormat {
            extension: "xlsx".to_string(),
        };
        assert!(err.to_string().contains("csv, parquet, json"));
    }
}
