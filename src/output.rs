//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Each report entry leads with its number and caption, exactly as it reads
//! in the report. The file it came from and the embedded size follow as
//! indented context lines, so the listing doubles as a table of contents
//! that can be traced back to the photo folder.
//!
//! # Output Format
//!
//! ```text
//! Report
//! 001 Cracked tile
//!     Source: IMG_0412.jpg
//!     Size: 900x675
//! 002 Loose railing
//!     Source: IMG_0415.jpg
//!     Size: 675x900
//!
//! Skipped 1 photo without a caption
//!     IMG_0413.jpg
//!
//! Wrote report.md, report.html
//! ```
//!
//! # Architecture
//!
//! [`format_report_output`] is pure and returns lines for testability;
//! [`print_report_output`] writes them to stdout.

use crate::report::{EntrySummary, ReportOutput};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// File name for display; the whole path when there is none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn entry_lines(entry: &EntrySummary) -> [String; 3] {
    [
        format!("{} {}", format_index(entry.number), entry.caption),
        format!("    Source: {}", display_name(&entry.source)),
        format!("    Size: {}x{}", entry.width, entry.height),
    ]
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format the summary of a finished run.
pub fn format_report_output(output: &ReportOutput) -> Vec<String> {
    let mut lines = vec!["Report".to_string()];

    if output.entries.is_empty() {
        lines.push("    (no captioned photos)".to_string());
    }
    for entry in &output.entries {
        lines.extend(entry_lines(entry));
    }

    if !output.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Skipped {} without a caption",
            plural(output.skipped.len(), "photo")
        ));
        for path in &output.skipped {
            lines.push(format!("    {}", display_name(path)));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Wrote {}, {}",
        output.markup_path.display(),
        output.html_path.display()
    ));
    lines
}

pub fn print_report_output(output: &ReportOutput) {
    for line in format_report_output(output) {
        println!("{}", line);
    }
}
