/// Identifies one pull request on a Bitbucket Server instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Project key (e.g., "CORE")
    pub project: String,
    /// Repository slug (e.g., "api-gateway")
    pub repository: String,
    /// Pull request id
    pub pr_id: u64,
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.project, self.repository, self.pr_id)
    }
}

/// Parsed parts of a pull request URL, before project defaulting.
/// Extracted by parse_pr_url() in pr/mod.rs.
#[derive(Debug, Clone)]
pub struct PrUrl {
    pub base_url: String,
    pub project: String,
    pub repository: String,
    pub pr_id: u64,
}

impl PrUrl {
    pub fn to_ref(&self) -> PullRequestRef {
        PullRequestRef {
            project: self.project.clone(),
            repository: self.repository.clone(),
            pr_id: self.pr_id,
        }
    }
}
