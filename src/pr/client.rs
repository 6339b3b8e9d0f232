use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, instrument, warn};

use super::{DiffSource, PrError, PullRequestRef};
use crate::config::Config;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = "bitbucket-pr-tools";

/// Fetches pull request diffs from the Bitbucket Server REST API.
#[derive(Debug, Clone)]
pub struct BitbucketClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl BitbucketClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, PrError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| PrError::InvalidParameters(format!("invalid base URL {:?}: {}", base_url, e)))?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Build a client from the loaded configuration.
    /// `base_url` overrides the configured server (e.g., taken from a PR URL).
    pub fn from_config(config: &Config, base_url: Option<&str>) -> Result<Self, PrError> {
        let base_url = base_url
            .or(config.bitbucket.base_url.as_deref())
            .ok_or(PrError::MissingBaseUrl)?;
        let timeout = Duration::from_secs(config.bitbucket.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        Self::new(base_url, config.bitbucket.token.clone(), timeout)
    }

    /// Build the diff endpoint for `pr`. Project and repository are each
    /// pushed as a single percent-encoded path segment.
    fn diff_url(&self, pr: &PullRequestRef) -> Result<Url, PrError> {
        for segment in [&pr.project, &pr.repository] {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(PrError::InvalidParameters(format!(
                    "invalid path segment {:?}",
                    segment
                )));
            }
        }

        let mut url = self.base_url.clone();
        let pr_id = pr.pr_id.to_string();
        url.path_segments_mut()
            .map_err(|_| PrError::InvalidParameters(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend([
                "rest",
                "api",
                "1.0",
                "projects",
                pr.project.as_str(),
                "repos",
                pr.repository.as_str(),
                "pull-requests",
                pr_id.as_str(),
                "diff",
            ]);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}

#[async_trait]
impl DiffSource for BitbucketClient {
    fn name(&self) -> &str {
        "bitbucket"
    }

    #[instrument(skip(self, pr), fields(pr = %pr))]
    async fn fetch_diff(&self, pr: &PullRequestRef, context_lines: u32) -> Result<String, PrError> {
        let url = self.diff_url(pr)?;
        debug!(%url, "fetching PR diff from Bitbucket");

        let mut request = self
            .client
            .get(url)
            .header("Accept", "text/plain")
            .query(&[("contextLines", context_lines)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Bitbucket returned an error");
            return Err(status_error(status, pr, &body));
        }

        let diff_text = response.text().await?;
        debug!(diff_bytes = diff_text.len(), "received PR diff");
        Ok(diff_text)
    }
}

/// Map a non-success HTTP status onto the error the caller should see.
fn status_error(status: StatusCode, pr: &PullRequestRef, body: &str) -> PrError {
    match status {
        StatusCode::NOT_FOUND => PrError::NotFound(pr.to_string()),
        StatusCode::BAD_REQUEST => PrError::InvalidParameters(summarize_body(body)),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PrError::Unauthorized {
            status: status.as_u16(),
        },
        _ => PrError::UpstreamUnavailable(format!("HTTP {}: {}", status.as_u16(), summarize_body(body))),
    }
}

fn summarize_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "no details".to_string();
    }
    body.chars().take(200).collect()
}
