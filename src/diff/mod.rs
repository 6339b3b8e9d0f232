//! Per-file truncation of unified diffs.
//!
//! A diff is split into file blocks, and any block whose content lines exceed
//! the budget is cut down to a head and tail window around a marker that
//! reports how much was hidden. Header and hunk header lines are always kept.

pub mod budget;
pub mod segment;
pub mod truncate;
pub mod types;

pub use budget::resolve_budget;
pub use types::{FileSummary, TruncatedDiff};

use tracing::debug;
use types::DiffBlock;

/// Truncate every file block of `diff` to at most `budget` content lines.
///
/// `None` or `Some(0)` returns the input unchanged.
pub fn truncate_diff(diff: &str, budget: Option<usize>) -> TruncatedDiff {
    let blocks = segment::segment(diff);
    let budget = budget.unwrap_or(0);

    let mut text = String::with_capacity(diff.len());
    let mut files = Vec::new();

    for block in &blocks {
        match block {
            DiffBlock::Other(line) => text.push_str(line),
            DiffBlock::File(file) => {
                let window = truncate::render_segment(file, budget, &mut text);
                if let Some(w) = window {
                    debug!(file = %file.file_name, hidden = w.hidden, head = w.head, tail = w.tail, "truncated file");
                }
                files.push(FileSummary {
                    file_name: file.file_name.clone(),
                    content_lines: file.content_len(),
                    window,
                });
            }
        }
    }

    TruncatedDiff { text, files }
}
