use crate::diff::FileSummary;
use crate::pr::PullRequestRef;
use crate::tools::ToolResponse;

/// How the diff should be written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Raw diff text
    #[default]
    Text,
    /// The tool response object as JSON
    Json,
}

/// Everything the CLI writes after one diff call.
#[derive(Debug)]
pub struct DiffReport {
    /// Pull request the diff belongs to
    pub pr: PullRequestRef,
    /// Budget that was applied (None = unlimited)
    pub budget: Option<usize>,
    /// Protocol response carrying the (possibly truncated) diff
    pub response: ToolResponse,
    /// Per-file outcome, in diff order
    pub files: Vec<FileSummary>,
}

impl DiffReport {
    pub fn truncated_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_truncated()).count()
    }

    pub fn hidden_lines(&self) -> usize {
        self.files
            .iter()
            .filter_map(|f| f.window.map(|w| w.hidden))
            .sum()
    }
}
