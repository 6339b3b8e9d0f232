use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::{DiffSource, PrError, PullRequestRef};

/// Serves a diff saved on disk, for offline use and demos.
/// The pull request reference and context lines are ignored.
#[derive(Debug, Clone)]
pub struct FileDiffSource {
    path: PathBuf,
}

impl FileDiffSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DiffSource for FileDiffSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_diff(&self, pr: &PullRequestRef, _context_lines: u32) -> Result<String, PrError> {
        debug!(path = %self.path.display(), %pr, "reading diff from file");
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
