use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::pull_request::{PullRequest, PullRequestDraft};
use crate::error::{AppError, AppResult};
use crate::services::CodeHostService;

const API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    http: Client,
    api_url: String,
    repository: Option<String>,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: String, repository: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_url,
            repository,
            token,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str)> {
        let repository = self.repository.as_deref().ok_or_else(|| {
            AppError::Configuration("GitHub repository (owner/name) not configured".to_string())
        })?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GitHub token not configured".to_string()))?;
        Ok((repository, token))
    }

    fn pulls_endpoint(api_url: &str, repository: &str) -> AppResult<String> {
        let repository = repository.trim().trim_matches('/');
        match repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(format!(
                    "{}/repos/{owner}/{name}/pulls",
                    api_url.trim_end_matches('/')
                ))
            }
            _ => Err(AppError::Configuration(format!(
                "GitHub repository must be 'owner/name', got '{repository}'"
            ))),
        }
    }
}

#[async_trait]
impl CodeHostService for GitHubClient {
    async fn create_pull_request(&self, draft: &PullRequestDraft) -> AppResult<PullRequest> {
        let (repository, token) = self.api_details()?;
        let endpoint = Self::pulls_endpoint(&self.api_url, repository)?;
        let request_body = CreatePullRequest {
            title: &draft.title,
            head: draft.head.as_str(),
            base: &draft.base,
            body: &draft.body,
        };

        let response = self
            .http
            .post(endpoint)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("handoff/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::CodeHost(format!("failed to call GitHub: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::CodeHost(format!(
                "GitHub responded with {status}: {body}"
            )));
        }

        let payload: CreatePullRequestResponse = response.json().await.map_err(|err| {
            AppError::CodeHost(format!("failed to parse GitHub response: {err}"))
        })?;
        info!(number = payload.number, "pull request opened");

        Ok(PullRequest {
            number: payload.number,
            url: payload.html_url,
        })
    }
}

#[derive(Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct CreatePullRequestResponse {
    number: u64,
    html_url: String,
}
