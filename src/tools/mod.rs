pub mod types;

pub use types::{ContentBlock, DiffSettings, GetPullRequestDiffArgs, ToolResponse};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::diff::{self, TruncatedDiff};
use crate::pr::{DiffSource, PrError, PullRequestRef};

pub const GET_PULL_REQUEST_DIFF: &str = "get_pull_request_diff";

/// Context lines requested when neither the call nor the config names any.
pub const DEFAULT_CONTEXT_LINES: u32 = 10;
const MAX_CONTEXT_LINES: u32 = 10_000;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<PrError> for ToolError {
    fn from(err: PrError) -> Self {
        match err {
            PrError::NotFound(what) => ToolError::NotFound(what),
            PrError::InvalidParameters(reason) => ToolError::InvalidParameters(reason),
            PrError::MissingBaseUrl => ToolError::InvalidParameters(err.to_string()),
            PrError::Unauthorized { .. } | PrError::UpstreamUnavailable(_) | PrError::Io(_) => {
                ToolError::UpstreamUnavailable(err.to_string())
            }
        }
    }
}

/// Outcome of one diff tool call: the protocol response plus the per-file
/// summary the CLI reports on.
#[derive(Debug)]
pub struct DiffCall {
    pub pr: PullRequestRef,
    /// Per-file budget the diff was truncated with; `None` is unlimited
    pub budget: Option<usize>,
    pub response: ToolResponse,
    pub truncated: TruncatedDiff,
}

/// Dispatch a tool call by name with raw JSON arguments.
pub async fn call(
    name: &str,
    args: Value,
    source: &dyn DiffSource,
    settings: &DiffSettings,
) -> Result<DiffCall, ToolError> {
    match name {
        GET_PULL_REQUEST_DIFF => {
            let args: GetPullRequestDiffArgs = serde_json::from_value(args)
                .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
            get_pull_request_diff(&args, source, settings).await
        }
        other => Err(ToolError::InvalidParameters(format!("unknown tool: {}", other))),
    }
}

/// Fetch one pull request diff and truncate it per file.
///
/// The per-file budget is the call's `maxLinesPerFile` if given (0 disables
/// truncation), otherwise the configured default, otherwise unlimited.
#[instrument(skip_all, fields(source = source.name(), repository = %args.repository, pr = args.pr_id))]
pub async fn get_pull_request_diff(
    args: &GetPullRequestDiffArgs,
    source: &dyn DiffSource,
    settings: &DiffSettings,
) -> Result<DiffCall, ToolError> {
    let pr = args.validate(settings.default_project.as_deref())?;
    let context_lines = args
        .context_lines
        .or(settings.context_lines)
        .unwrap_or(DEFAULT_CONTEXT_LINES);
    if context_lines > MAX_CONTEXT_LINES {
        return Err(ToolError::InvalidParameters(format!(
            "contextLines must be at most {}",
            MAX_CONTEXT_LINES
        )));
    }
    let budget = diff::resolve_budget(args.max_lines_per_file, settings.max_lines_per_file);
    debug!(%pr, context_lines, ?budget, "resolved diff request");

    let raw = source.fetch_diff(&pr, context_lines).await?;
    let truncated = diff::truncate_diff(&raw, budget);
    info!(
        files = truncated.files.len(),
        truncated_files = truncated.truncated_files().count(),
        bytes_in = raw.len(),
        bytes_out = truncated.text.len(),
        "diff ready"
    );

    Ok(DiffCall {
        pr,
        budget,
        response: ToolResponse::text(truncated.text.clone()),
        truncated,
    })
}
