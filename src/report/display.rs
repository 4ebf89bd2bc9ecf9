//! Console tables for analysis results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    AnalysisSummary, CorrelationMatrix, CorrelationStrength, IpaResult, Quadrant, QuestionStats,
    TTestResult, TextQuestionSummary,
};
use crate::utils::truncate_string;

/// Longest label shown in a table cell
const LABEL_WIDTH: usize = 36;

/// Most correlated pairs listed on the console
const MAX_CORRELATION_ROWS: usize = 15;

fn section_header(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn number_cell(value: f64, decimals: usize) -> Cell {
    Cell::new(format!("{:.*}", decimals, value)).set_alignment(CellAlignment::Right)
}

/// Dataset overview card
pub fn display_dataset_overview(summary: &AnalysisSummary) {
    section_header("📋", "DATASET OVERVIEW");

    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Project"), Cell::new(&summary.project_name)]);
    table.add_row(vec![
        Cell::new("Respondents"),
        Cell::new(summary.total_responses).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Questions"),
        Cell::new(summary.total_questions).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Text questions"),
        Cell::new(summary.text_questions.len()),
    ]);
    table.add_row(vec![
        Cell::new("Source"),
        Cell::new(summary.data_source.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Overall mean"),
        Cell::new(format!("{:.2}", summary.overall_mean))
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    print_indented(&table);
}

/// Per-question descriptive statistics
pub fn display_question_stats(stats: &[QuestionStats]) {
    section_header("📊", "QUESTION STATISTICS");

    let mut table = new_table(&["ID", "Question", "Type", "N", "Mean", "Median", "SD", "Min", "Max"]);
    for question in stats {
        let s = &question.stats;
        let mut row = vec![
            Cell::new(&question.question_id),
            Cell::new(truncate_string(&question.question_label, LABEL_WIDTH)),
            Cell::new(question.response_type.to_string()),
            Cell::new(question.response_count).set_alignment(CellAlignment::Right),
        ];
        if s.count > 0 {
            row.extend([
                number_cell(s.mean, 2),
                number_cell(s.median, 2),
                number_cell(s.std_dev, 2),
                number_cell(s.min, 1),
                number_cell(s.max, 1),
            ]);
        } else {
            row.extend((0..5).map(|_| Cell::new("-").fg(Color::DarkGrey)));
        }
        table.add_row(row);
    }
    print_indented(&table);
}

fn strength_color(strength: CorrelationStrength) -> Color {
    match strength {
        CorrelationStrength::Strong => Color::Green,
        CorrelationStrength::Moderate => Color::Yellow,
        CorrelationStrength::Weak => Color::Cyan,
        CorrelationStrength::None => Color::DarkGrey,
    }
}

/// Question pairs whose |r| reaches `min_abs`, strongest first
pub fn display_correlation_highlights(matrix: &CorrelationMatrix, min_abs: f64) {
    section_header("🔗", "CORRELATIONS");

    if matrix.len() < 2 {
        println!("    {}", style("Not enough numeric questions to correlate").dim());
        return;
    }

    let pairs = matrix.strongest_pairs(min_abs);
    if pairs.is_empty() {
        println!(
            "    {}",
            style(format!("No question pairs with |r| >= {:.2}", min_abs)).dim()
        );
        return;
    }

    let mut table = new_table(&["Question 1", "Question 2", "r", "Strength"]);
    for pair in pairs.iter().take(MAX_CORRELATION_ROWS) {
        table.add_row(vec![
            Cell::new(truncate_string(&pair.question1, LABEL_WIDTH)),
            Cell::new(truncate_string(&pair.question2, LABEL_WIDTH)),
            number_cell(pair.correlation, 3),
            Cell::new(pair.strength.to_string()).fg(strength_color(pair.strength)),
        ]);
    }
    print_indented(&table);

    if pairs.len() > MAX_CORRELATION_ROWS {
        println!(
            "    {}",
            style(format!("... and {} more", pairs.len() - MAX_CORRELATION_ROWS)).dim()
        );
    }
}

/// Paired t-test results
pub fn display_t_tests(results: &[TTestResult]) {
    section_header("⚖️", "PAIRED T-TESTS");

    if results.is_empty() {
        println!("    {}", style("No pre/post question pairs detected").dim());
        return;
    }

    let mut table = new_table(&["Before", "After", "n", "Mean A", "Mean B", "Diff", "t", "p"]);
    for r in results {
        let p_cell = number_cell(r.p_value, 4);
        let p_cell = if r.significant {
            p_cell.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            p_cell
        };
        table.add_row(vec![
            Cell::new(truncate_string(&r.question_a_label, LABEL_WIDTH)),
            Cell::new(truncate_string(&r.question_b_label, LABEL_WIDTH)),
            Cell::new(r.n).set_alignment(CellAlignment::Right),
            number_cell(r.mean_a, 2),
            number_cell(r.mean_b, 2),
            number_cell(r.mean_diff, 2),
            number_cell(r.t_statistic, 3),
            p_cell,
        ]);
    }
    print_indented(&table);
}

fn quadrant_color(quadrant: Quadrant) -> Color {
    match quadrant {
        Quadrant::KeepUp => Color::Green,
        Quadrant::ConcentrateHere => Color::Red,
        Quadrant::LowPriority => Color::DarkGrey,
        Quadrant::PossibleOverkill => Color::Yellow,
    }
}

/// Importance-performance items with their quadrant
pub fn display_ipa(result: &IpaResult) {
    section_header("🎯", &format!("IMPORTANCE-PERFORMANCE ({})", result.method));

    if result.items.is_empty() {
        println!("    {}", style("Not enough numeric questions for IPA").dim());
        return;
    }

    let mut table = new_table(&["Item", "Importance", "Performance", "Quadrant"]);
    for item in &result.items {
        table.add_row(vec![
            Cell::new(truncate_string(&item.label, LABEL_WIDTH)),
            number_cell(item.importance, 2),
            number_cell(item.performance, 2),
            Cell::new(item.quadrant.to_string()).fg(quadrant_color(item.quadrant)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Mean").add_attribute(Attribute::Bold),
        number_cell(result.importance_mean, 2).add_attribute(Attribute::Bold),
        number_cell(result.performance_mean, 2).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    print_indented(&table);
}

/// Free-text questions with their top keywords
pub fn display_text_summaries(summaries: &[TextQuestionSummary]) {
    section_header("💬", "TEXT RESPONSES");

    if summaries.is_empty() {
        println!("    {}", style("No free-text questions").dim());
        return;
    }

    let mut table = new_table(&["Question", "Responses", "Avg length", "Top keywords"]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(truncate_string(&summary.question_label, LABEL_WIDTH)),
            Cell::new(summary.response_count).set_alignment(CellAlignment::Right),
            number_cell(summary.average_length, 1),
            Cell::new(summary.top_keywords.join(", ")),
        ]);
    }
    print_indented(&table);
}
