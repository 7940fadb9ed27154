//! GitHub commit status client

use crate::error::{NotifyError, Result};
use crate::traits::StatusSink;
use crate::types::{RepositoryId, StatusReport};
use reqwest::StatusCode;
use std::future::Future;

/// Posts commit statuses to the GitHub REST API
///
/// One attempt per report; anything but `201 Created` is an error.
pub struct GitHubStatusClient {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for GitHubStatusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubStatusClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GitHubStatusClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cpstatus/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint: POST /repos/{owner}/{repo}/statuses/{sha}
    pub fn statuses_url(&self, repository: &RepositoryId, commit: &str) -> String {
        format!("{}/repos/{}/statuses/{}", self.base_url, repository, commit)
    }
}

impl StatusSink for GitHubStatusClient {
    fn post_status<'a>(
        &'a self,
        repository: &'a RepositoryId,
        commit: &'a str,
        report: &'a StatusReport,
        token: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a {
        async move {
            let url = self.statuses_url(repository, commit);
            let body = serde_json::to_vec(report)?;

            let response = self
                .client
                .post(&url)
                .header("Accept", "application/json")
                .header("Authorization", format!("token {}", token))
                .header("Content-Type", "application/json; charset=utf-8")
                .body(body)
                .send()
                .await
                .map_err(NotifyError::from)?;

            let status = response.status();
            if status != StatusCode::CREATED {
                let body = response.text().await.unwrap_or_default();
                return Err(NotifyError::Rejected {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }

            tracing::debug!(%repository, commit, "status accepted");
            Ok(())
        }
    }
}
