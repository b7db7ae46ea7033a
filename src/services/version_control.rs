use async_trait::async_trait;

use crate::domain::branch::BranchName;
use crate::domain::change::ChangeSummary;
use crate::domain::commit::CommitMessage;
use crate::domain::ticket::TicketId;
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub enum BranchingStrategy {
    TicketKeyPrefix { prefix: String },
    Raw,
}

impl BranchingStrategy {
    pub fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix.map(str::trim).filter(|prefix| !prefix.is_empty()) {
            Some(prefix) => BranchingStrategy::TicketKeyPrefix {
                prefix: prefix.to_string(),
            },
            None => BranchingStrategy::Raw,
        }
    }

    pub fn format_branch(&self, ticket: &TicketId, summary: &str) -> BranchName {
        match self {
            BranchingStrategy::TicketKeyPrefix { prefix } => {
                BranchName::with_prefix(ticket, summary, prefix)
            }
            BranchingStrategy::Raw => BranchName::from_parts(ticket, summary),
        }
    }
}

#[async_trait]
pub trait VersionControlService: Send + Sync {
    async fn summarize_changes(&self) -> AppResult<ChangeSummary>;
    /// Check out `main` and fast-forward it from the remote.
    async fn sync_main(&self, main: &str) -> AppResult<()>;
    async fn create_branch(&self, branch: &BranchName) -> AppResult<()>;
    async fn current_branch(&self) -> AppResult<String>;
    async fn last_commit_subject(&self) -> AppResult<String>;
    async fn stage_all(&self) -> AppResult<()>;
    async fn commit(&self, message: &CommitMessage) -> AppResult<()>;
    async fn push(&self, branch: &BranchName) -> AppResult<()>;
}
