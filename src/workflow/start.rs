use tracing::info;

use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::ticket::{Ticket, TicketId};
use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct StartOutcome {
    pub ticket: Ticket,
    pub branch: BranchName,
}

/// Reads the ticket, refreshes the main branch and creates the ticket branch.
/// A supplied summary stands in for the tracker's title and skips the lookup.
pub async fn start_ticket(
    ctx: &AppContext,
    ticket_id: &str,
    summary: Option<&str>,
) -> AppResult<StartOutcome> {
    let id = TicketId::parse(ticket_id)?;
    let ticket = match summary.map(str::trim).filter(|summary| !summary.is_empty()) {
        Some(summary) => Ticket::local(id, summary),
        None => ctx.issue_tracker.fetch_ticket(&id).await?,
    };

    if ticket.title.trim().is_empty() {
        return Err(AppError::IssueTracker(format!(
            "ticket {} has no title; pass --summary to name the branch",
            ticket.id
        )));
    }

    let branch = ctx.config.branching.format_branch(&ticket.id, &ticket.title);
    ctx.version_control
        .sync_main(&ctx.config.main_branch)
        .await?;
    ctx.version_control.create_branch(&branch).await?;
    info!(ticket = %ticket.id, branch = %branch, "ticket branch created");

    Ok(StartOutcome { ticket, branch })
}
