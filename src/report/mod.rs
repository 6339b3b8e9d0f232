pub mod types;

pub use types::{DiffReport, OutputFormat};

use crate::tools::{ContentBlock, DiffCall};
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write output file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Build a DiffReport from a finished tool call.
pub fn build(call: DiffCall) -> DiffReport {
    DiffReport {
        pr: call.pr,
        budget: call.budget,
        response: call.response,
        files: call.truncated.files,
    }
}

/// Write the diff to stdout (default) or to a file, then print the
/// truncation summary to stderr so piped output stays a clean diff.
#[instrument(skip(report), fields(pr = %report.pr, truncated = report.truncated_count()))]
pub fn output(
    report: &DiffReport,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<(), ReportError> {
    let body = render(report, format)?;
    match output_path {
        None => {
            debug!("writing diff to stdout");
            print!("{}", body);
        }
        Some(path) => {
            debug!(path = %path.display(), "writing diff to file");
            std::fs::write(path, &body)?;
        }
    }
    eprint!("{}", summary(report));
    Ok(())
}

/// Render the report body in the requested format.
fn render(report: &DiffReport, format: OutputFormat) -> Result<String, ReportError> {
    match format {
        OutputFormat::Text => Ok(report
            .response
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&report.response)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// One-paragraph summary of what was cut.
///
/// PR CORE/api#42: 3 files, 1 truncated (90 lines hidden, limit 10/file)
///   ✂ src/app.ts: 100 lines, showing 6 + 4
fn summary(report: &DiffReport) -> String {
    let limit = match report.budget {
        Some(n) => format!("limit {}/file", n),
        None => "no limit".to_string(),
    };
    let truncated = report.truncated_count();
    let headline = format!(
        "PR {}: {} files, {} truncated ({} lines hidden, {})",
        report.pr,
        report.files.len(),
        truncated,
        report.hidden_lines(),
        limit
    );

    let mut out = String::new();
    if truncated == 0 {
        out.push_str(&format!("{}\n", headline.green()));
        return out;
    }

    out.push_str(&format!("{}\n", headline.yellow().bold()));
    for file in &report.files {
        if let Some(window) = file.window {
            out.push_str(&format!(
                "  {} {}: {} lines, showing {} + {}\n",
                "✂".red(),
                file.file_name,
                file.content_lines,
                window.head,
                window.tail
            ));
        }
    }
    out
}
