use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::ReviewError;

const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("diffsage/", env!("CARGO_PKG_VERSION"));

/// Minimal GitHub client: one operation, posting an issue comment on a
/// pull request.
pub struct GitHubClient {
    http: Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: String, base_url: Option<String>) -> Result<Self, ReviewError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| {
                ReviewError::PublishTransport(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            token,
            base_url: base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Post `body` as a new comment on the pull request.
    ///
    /// Transport failures and non-success statuses are both errors: a review
    /// GitHub rejected was not posted, and the run has to say so.
    pub async fn post_comment(
        &self,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<(), ReviewError> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.base_url, repo, pr_number
        );
        debug!(%url, "posting review comment");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| ReviewError::PublishTransport(format!("failed to reach GitHub: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::PublishStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
