use async_trait::async_trait;

use crate::domain::pull_request::{PullRequest, PullRequestDraft};
use crate::error::AppResult;

#[async_trait]
pub trait CodeHostService: Send + Sync {
    async fn create_pull_request(&self, draft: &PullRequestDraft) -> AppResult<PullRequest>;
}
