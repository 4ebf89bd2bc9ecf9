//! Likert: Survey Analysis CLI Tool
//!
//! A command-line tool for descriptive statistics, correlations, paired
//! t-tests and importance-performance analysis of survey responses.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use console::style;

use likert::cli::{self, confirm_overwrite, Cli, Commands};
use likert::pipeline::{
    generate_analysis_summary, generate_correlation_matrix, generate_ipa, generate_paired_t_tests,
    load_dataset, merge_datasets, AnalysisKind, IpaMethod, LoadOptions,
};
use likert::report::{
    display_correlation_highlights, display_dataset_overview, display_ipa, display_question_stats,
    display_t_tests, display_text_summaries, export_analysis_report, export_question_stats_csv,
    package_reports, AnalysisReport,
};
use likert::utils::{
    create_spinner, finish_with_success, finish_with_warning, init_logging, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Convert {
                input,
                output,
                project_name,
                respondent_column,
                encoding,
                infer_schema_length,
            } => {
                let options = LoadOptions {
                    project_name: project_name.clone(),
                    respondent_column: respondent_column.clone(),
                    encoding: *encoding,
                    infer_schema_length: *infer_schema_length,
                };
                cli::convert::run_convert(input, output.as_deref(), &options)
            }
        };
    }

    // Main analysis pipeline - require input
    if cli.inputs.is_empty() {
        anyhow::bail!("Input file is required. Use -i/--input to specify a file.");
    }
    let (output_path, csv_path, bundle_path) =
        match (cli.output_path(), cli.csv_path(), cli.bundle_path()) {
            (Some(output), Some(csv), Some(bundle)) => (output, csv, bundle),
            _ => anyhow::bail!("Could not derive output paths from the input file"),
        };

    let config = cli.analysis_config();
    let write_csv = config.analyses.contains(AnalysisKind::Basic);

    let mut targets: Vec<&Path> = if cli.bundle {
        vec![bundle_path.as_path()]
    } else {
        vec![output_path.as_path()]
    };
    if write_csv && !cli.bundle {
        targets.push(csv_path.as_path());
    }
    let existing: Vec<&Path> = targets.into_iter().filter(|p| p.exists()).collect();
    if !existing.is_empty() && !cli.no_confirm && !confirm_overwrite(&existing)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.inputs, &output_path, &config);

    let mut step = 0u8;
    let mut next_step = |title: &str| {
        step += 1;
        print_step_header(step, title);
    };

    // Load and merge inputs
    next_step("Load Survey Data");
    let load_options = cli.load_options();
    let mut datasets = Vec::with_capacity(cli.inputs.len());
    for input in &cli.inputs {
        let spinner = create_spinner(&format!("Loading {}...", input.display()));
        let dataset = load_dataset(input, &load_options)?;
        finish_with_success(
            &spinner,
            &format!(
                "{} ({} responses)",
                input.display(),
                dataset.responses.len()
            ),
        );
        datasets.push(dataset);
    }
    if datasets.len() > 1 {
        print_info(&format!("Merging {} datasets", datasets.len()));
    }
    let dataset = merge_datasets(datasets)?;
    print_count(
        "respondent(s)",
        dataset.metadata.total_respondents,
        Some(&format!("({} responses)", dataset.responses.len())),
    );

    // Descriptive statistics and text summaries
    next_step("Descriptive Statistics");
    let spinner = create_spinner("Summarizing questions...");
    let mut summary = generate_analysis_summary(&dataset, config.keyword_limit);
    if !config.analyses.contains(AnalysisKind::Basic) {
        summary.question_stats.clear();
    }
    if !config.analyses.contains(AnalysisKind::Text) {
        summary.text_questions.clear();
    }
    finish_with_success(
        &spinner,
        &format!("{} question(s) summarized", summary.total_questions),
    );

    if !cli.quiet {
        display_dataset_overview(&summary);
        if config.analyses.contains(AnalysisKind::Basic) {
            display_question_stats(&summary.question_stats);
        }
        if config.analyses.contains(AnalysisKind::Text) {
            display_text_summaries(&summary.text_questions);
        }
    }

    let mut report = AnalysisReport::new(summary, &cli.inputs, config.clone());

    if config.analyses.contains(AnalysisKind::Correlation) {
        next_step("Correlation Analysis");
        let matrix = generate_correlation_matrix(&dataset, None);
        if matrix.len() < 2 {
            print_info("Fewer than two numeric questions, correlation skipped");
        } else {
            print_count("numeric question(s)", matrix.len(), None);
            print_success("Correlation matrix built");
        }
        if !cli.quiet {
            display_correlation_highlights(&matrix, config.min_correlation);
        }
        report.correlation = Some(matrix);
    }

    if config.analyses.contains(AnalysisKind::TTest) {
        next_step("Paired T-Tests");
        let spinner = create_spinner("Detecting pre/post question pairs...");
        let results = generate_paired_t_tests(&dataset);
        if results.is_empty() {
            finish_with_warning(&spinner, "No testable pre/post pairs found");
        } else {
            let significant = results.iter().filter(|r| r.significant).count();
            finish_with_success(
                &spinner,
                &format!(
                    "{} pair(s) tested, {} significant",
                    results.len(),
                    significant
                ),
            );
        }
        if !cli.quiet {
            display_t_tests(&results);
        }
        report.t_tests = Some(results);
    }

    if config.analyses.contains(AnalysisKind::Ipa) {
        next_step("Importance-Performance Analysis");
        let spinner = create_spinner("Classifying items...");
        let ipa = generate_ipa(&dataset)?;
        finish_with_success(
            &spinner,
            &format!("{} item(s) classified", ipa.items.len()),
        );
        if ipa.method == IpaMethod::Derived {
            print_info("No importance/performance question pairs, importance derived from correlations");
        }
        if !cli.quiet {
            display_ipa(&ipa);
        }
        report.ipa = Some(ipa);
    }

    // Save reports
    next_step("Save Results");
    let spinner = create_spinner("Writing report files...");
    export_analysis_report(&report, &output_path)?;
    let mut written: Vec<PathBuf> = vec![output_path.clone()];
    if write_csv {
        export_question_stats_csv(&report.summary.question_stats, &csv_path)?;
        written.push(csv_path.clone());
    }

    if cli.bundle {
        let paths: Vec<&Path> = written.iter().map(PathBuf::as_path).collect();
        package_reports(&paths, &bundle_path)?;
        finish_with_success(
            &spinner,
            &format!("Saved bundle to {}", bundle_path.display()),
        );
    } else {
        finish_with_success(&spinner, "Reports saved");
        for path in &written {
            println!("      {}", style(path.display()).dim());
        }
    }

    print_completion();

    Ok(())
}
