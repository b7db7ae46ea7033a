use async_trait::async_trait;

use crate::domain::change::{ChangeSummary, HandoffDraft};
use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn draft_handoff(
        &self,
        changes: &ChangeSummary,
        ticket: Option<&Ticket>,
    ) -> AppResult<HandoffDraft>;
}
