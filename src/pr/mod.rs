pub mod client;
pub mod local;
pub mod types;

pub use client::BitbucketClient;
pub use local::FileDiffSource;
pub use types::{PrUrl, PullRequestRef};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("Pull request not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Bitbucket rejected the credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Bitbucket is unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Bitbucket base URL is not configured (set BITBUCKET_URL)")]
    MissingBaseUrl,

    #[error("Failed to read diff file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PrError {
    fn from(err: reqwest::Error) -> Self {
        PrError::UpstreamUnavailable(err.to_string())
    }
}

/// Where raw pull request diffs come from.
/// Sources must be Send + Sync so tool calls can share them across tasks.
#[async_trait]
pub trait DiffSource: Send + Sync {
    /// Short name for logs (e.g., "bitbucket")
    fn name(&self) -> &str;

    /// Fetch the raw unified diff for `pr`, with `context_lines` of context
    /// around each change.
    async fn fetch_diff(&self, pr: &PullRequestRef, context_lines: u32) -> Result<String, PrError>;
}

/// Parse a Bitbucket Server pull request URL into its component parts.
///
/// Expected format:
/// https://{host}[/{context}]/projects/{PROJECT}/repos/{repo}/pull-requests/{id}[/...]
/// Anything after the id (e.g., "/diff", "/overview") is ignored.
pub fn parse_pr_url(url: &str) -> Result<PrUrl, PrError> {
    let invalid = || PrError::InvalidParameters(format!("not a pull request URL: {}", url));
    let parsed = reqwest::Url::parse(url).map_err(|_| invalid())?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let segments: Vec<_> = parsed
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|segment| !segment.is_empty())
        .collect();

    let start = segments
        .iter()
        .position(|segment| *segment == "projects")
        .ok_or_else(invalid)?;
    let rest = &segments[start..];
    if rest.len() < 6 || rest[2] != "repos" || rest[4] != "pull-requests" {
        return Err(invalid());
    }

    let pr_id = rest[5].parse::<u64>().map_err(|_| invalid())?;
    if pr_id == 0 {
        return Err(invalid());
    }

    let mut base = parsed.clone();
    base.set_query(None);
    base.set_fragment(None);
    base.set_path(&segments[..start].join("/"));
    let base_url = base.as_str().trim_end_matches('/').to_string();

    Ok(PrUrl {
        base_url,
        project: rest[1].to_string(),
        repository: rest[3].to_string(),
        pr_id,
    })
}
