//! CLI output formatting.
//!
//! Each `format_*` function is pure and returns lines so it can be tested
//! without capturing stdout; the matching `print_*` wrapper writes them.
//! Diagnostics (vanished files, per-page events) go through `tracing` on
//! stderr instead.
//!
//! # Output Format
//!
//! ```text
//! Writing site/docs/index.html
//! Writing site/index.html
//! Indexed 2 directories
//! Skipped 1 file that disappeared during indexing
//! ```

use crate::indexer::IndexReport;

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// One `Writing` line per page in write order, then a summary.
pub fn format_index_report(report: &IndexReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .written
        .iter()
        .map(|path| format!("Writing {}", path.display()))
        .collect();

    lines.push(format!(
        "Indexed {}",
        plural(report.written.len(), "directory", "directories")
    ));
    if !report.skipped.is_empty() {
        lines.push(format!(
            "Skipped {} that disappeared during indexing",
            plural(report.skipped.len(), "file", "files")
        ));
    }
    lines
}

pub fn print_index_report(report: &IndexReport) {
    for line in format_index_report(report) {
        println!("{line}");
    }
}
