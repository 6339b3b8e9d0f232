use serde::{Deserialize, Serialize};

use super::ToolError;
use crate::config::Config;
use crate::pr::PullRequestRef;

/// Arguments of the `get_pull_request_diff` tool.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPullRequestDiffArgs {
    /// Project key; falls back to the configured default project
    #[serde(default)]
    pub project: Option<String>,
    /// Repository slug
    #[serde(default)]
    pub repository: String,
    /// Pull request id
    pub pr_id: u64,
    /// Context lines around each change
    #[serde(default)]
    pub context_lines: Option<u32>,
    /// Per-file content-line cap; 0 disables truncation
    #[serde(default)]
    pub max_lines_per_file: Option<usize>,
}

impl GetPullRequestDiffArgs {
    /// Check the arguments and resolve the project against `default_project`.
    pub fn validate(&self, default_project: Option<&str>) -> Result<PullRequestRef, ToolError> {
        let repository = self.repository.trim();
        if repository.is_empty() {
            return Err(ToolError::InvalidParameters("repository is required".to_string()));
        }
        check_slug("repository", repository)?;
        if self.pr_id == 0 {
            return Err(ToolError::InvalidParameters("prId must be a positive integer".to_string()));
        }
        let project = self
            .project
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or(default_project)
            .ok_or_else(|| {
                ToolError::InvalidParameters(
                    "project is required (or set BITBUCKET_DEFAULT_PROJECT)".to_string(),
                )
            })?;
        check_slug("project", project)?;

        Ok(PullRequestRef {
            project: project.to_string(),
            repository: repository.to_string(),
            pr_id: self.pr_id,
        })
    }
}

/// Project keys and repository slugs are single URL path segments.
fn check_slug(field: &str, value: &str) -> Result<(), ToolError> {
    if value == "." || value == ".." || value.contains(&['/', '\\', '?', '#'][..]) {
        return Err(ToolError::InvalidParameters(format!(
            "{} {:?} is not a valid key or slug",
            field, value
        )));
    }
    Ok(())
}

/// Process-wide defaults passed into every tool call.
/// Read once from the config at startup.
#[derive(Debug, Clone, Default)]
pub struct DiffSettings {
    pub default_project: Option<String>,
    pub max_lines_per_file: Option<usize>,
    pub context_lines: Option<u32>,
}

impl From<&Config> for DiffSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_project: config.bitbucket.default_project.clone(),
            max_lines_per_file: config.diff.max_lines_per_file,
            context_lines: config.diff.context_lines,
        }
    }
}

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// The response object returned to the protocol layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    pub content: Vec<ContentBlock>,
}

impl ToolResponse {
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ContentBlock::Text { text }],
        }
    }
}
