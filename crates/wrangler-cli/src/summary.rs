//! Human-readable output tables.

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use wrangler_model::{DataProfile, PipelineState, RankedTransformation};
use wrangler_pipeline::PipelineOutcome;

/// Print the run summary and ranked transformations.
pub fn print_outcome(outcome: &PipelineOutcome, top: usize) {
    if outcome.success {
        println!(
            "pipeline finished in {:.2}s",
            outcome.execution_time.as_secs_f64()
        );
    } else {
        println!(
            "pipeline failed after {:.2}s: {}",
            outcome.execution_time.as_secs_f64(),
            outcome.error.as_deref().unwrap_or("unknown error")
        );
        return;
    }

    if let Some(error) = &outcome.error {
        println!("note: {error}");
    }

    if outcome.ranked_transformations.is_empty() {
        println!("no ranked transformations");
        return;
    }
    print_ranked(&outcome.ranked_transformations, top);
}

pub fn print_ranked(ranked: &[RankedTransformation], top: usize) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["rank", "transformation", "columns", "score", "delta"]);

    for entry in ranked.iter().take(top) {
        let transformation = &entry.candidate.transformation;
        table.add_row(vec![
            entry.rank.to_string(),
            transformation.description.clone(),
            transformation.target_columns.join(", "),
            format!("{:.4}", entry.composite_score),
            format!("{:+.4}", entry.candidate.quality_delta.composite_delta),
        ]);
    }

    println!("{table}");

    if let Some(best) = ranked.first() {
        println!("\ntop pick: {}", best.reasoning);
    }
}

/// Print a per-column profile summary.
pub fn print_profile(profile: &DataProfile) {
    println!(
        "{} rows x {} columns, {:.1}% missing, {} duplicate rows",
        profile.row_count,
        profile.column_count,
        profile.overall_missing_percentage,
        profile.duplicate_rows
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "column", "dtype", "inferred", "nulls", "unique", "min", "max", "mean",
        ]);

    for column in profile.columns.values() {
        table.add_row(vec![
            column.name.clone(),
            column.dtype.clone(),
            column.inferred_type.to_string(),
            column.null_count.to_string(),
            column
                .unique_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            format_opt(column.min_value),
            format_opt(column.max_value),
            format_opt(column.mean),
        ]);
    }

    println!("{table}");
}

/// Print a recovered checkpoint.
pub fn print_state(state: &PipelineState) {
    println!(
        "current step: {} (completed: {})",
        state.current_step,
        state
            .completed_steps
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("candidates evaluated: {}", state.candidates.len());
    if let Some(error) = &state.error {
        println!("recorded error: {error}");
    }
    if !state.ranked_transformations.is_empty() {
        print_ranked(&state.ranked_transformations, 10);
    }
}

fn format_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string())
}
