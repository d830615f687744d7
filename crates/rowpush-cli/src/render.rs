//! Printing command results
//!
//! Reports, record previews and database lists go to stdout, as tables or as
//! JSON with `--output json`.

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use rowpush_ingest::{DeliveryReport, Record, RunStatus};

use crate::error::Result;
use crate::progress::format_duration;
use crate::OutputFormat;

pub fn print_report(report: &DeliveryReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => print!("{}", report_text(report)),
    }
    Ok(())
}

/// Human-readable report: summary table, failed chunks, source errors
pub fn report_text(report: &DeliveryReport) -> String {
    let mut out = String::new();

    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);
    summary.add_row(vec![Cell::new("Run"), Cell::new(report.run_id())]);
    summary.add_row(vec![
        Cell::new("Status"),
        Cell::new(report.status()).fg(status_color(report.status())),
    ]);
    summary.add_row(vec![
        Cell::new("Records delivered"),
        Cell::new(format!("{} / {}", report.records_delivered(), report.total_records())),
    ]);
    summary.add_row(vec![Cell::new("Chunks"), Cell::new(report.chunks_attempted())]);
    summary.add_row(vec![
        Cell::new("Duration"),
        Cell::new(format_duration(report.duration())),
    ]);
    out.push_str(&format!("{}\n", summary));

    if !report.failed_chunks().is_empty() {
        let mut failed = Table::new();
        failed
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Chunk", "Rows", "Attempts", "Last error"]);
        for chunk in report.failed_chunks() {
            failed.add_row(vec![
                Cell::new(chunk.index),
                Cell::new(chunk.rows),
                Cell::new(chunk.attempts_made),
                Cell::new(&chunk.error).fg(Color::Red),
            ]);
        }
        out.push_str(&format!("\n{}\n{}\n", "Failed chunks:".red().bold(), failed));
    }

    if !report.source_errors().is_empty() {
        out.push_str(&format!("\n{}\n", "Source errors:".red().bold()));
        for error in report.source_errors() {
            out.push_str(&format!("  {} {}\n", "✗".red(), error));
        }
    }

    out
}

fn status_color(status: RunStatus) -> Color {
    match status {
        RunStatus::Delivered => Color::Green,
        RunStatus::NothingToDeliver => Color::Cyan,
        RunStatus::Partial => Color::Yellow,
        RunStatus::Failed => Color::Red,
    }
}

/// Records as a pretty JSON array, exactly as they would be sent
pub fn print_records(records: &[Record]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

pub fn print_databases(names: &[String], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(names)?),
        OutputFormat::Text if names.is_empty() => println!("No databases found."),
        OutputFormat::Text => {
            println!("{}", format!("Databases ({}):", names.len()).cyan().bold());
            for name in names {
                println!("  {}", name);
            }
        },
    }
    Ok(())
}
