use async_trait::async_trait;

use crate::domain::ticket::{Ticket, TicketId};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn fetch_ticket(&self, id: &TicketId) -> AppResult<Ticket>;
}
