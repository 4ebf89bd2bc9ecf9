//! Wide survey table to dataset JSON conversion

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;

use crate::pipeline::{load_dataset, AnalysisDataset, LoadOptions, ResponseType};
use crate::utils::create_spinner;

/// Default output path: the input with a `.json` extension
pub fn default_convert_output(input: &Path) -> PathBuf {
    input.with_extension("json")
}

/// Write a dataset as pretty-printed JSON
pub fn write_dataset_json(dataset: &AnalysisDataset, output: &Path) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), dataset)
        .with_context(|| format!("Failed to write dataset JSON: {}", output.display()))?;
    Ok(())
}

/// Run the table to dataset JSON conversion
///
/// # Arguments
/// * `input` - Path to the input CSV or Parquet file
/// * `output` - Optional output path. If not provided, uses input path with .json extension
/// * `options` - Loader options (respondent column, encoding, schema inference)
pub fn run_convert(input: &Path, output: Option<&Path>, options: &LoadOptions) -> Result<()> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_convert_output(input));

    if output_path == input {
        anyhow::bail!(
            "Output path must differ from the input: {}",
            input.display()
        );
    }

    println!(
        "\n {} Converting survey table to dataset JSON",
        style("◆").cyan().bold()
    );
    println!("   Input:  {}", style(input.display()).dim());
    println!("   Output: {}", style(output_path.display()).dim());
    println!();

    let spinner = create_spinner("Reading survey table...");
    let dataset = load_dataset(input, options)?;
    spinner.finish_with_message(format!(
        "{} Table loaded ({} responses)",
        style("✓").green(),
        dataset.responses.len()
    ));

    let spinner = create_spinner("Writing dataset JSON...");
    write_dataset_json(&dataset, &output_path)?;
    spinner.finish_with_message(format!("{} Dataset JSON written", style("✓").green()));

    let count_type = |t: ResponseType| {
        dataset
            .responses
            .iter()
            .filter(|r| r.response_type == t)
            .count()
    };

    println!();
    println!(
        "   {} respondents × {} responses",
        style(dataset.metadata.total_respondents).yellow(),
        style(dataset.responses.len()).yellow()
    );
    println!("   {} Response types:", style("✧").cyan());
    for t in [
        ResponseType::Likert,
        ResponseType::Numeric,
        ResponseType::Boolean,
        ResponseType::Text,
    ] {
        println!("      {:<8} {}", t.to_string(), count_type(t));
    }

    println!();
    println!(" {} Conversion complete!", style("✓").green().bold());

    Ok(())
}
