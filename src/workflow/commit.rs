use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::commit::CommitMessage;
use crate::domain::verification::VerificationReport;
use crate::error::{AppError, AppResult};
use crate::workflow::verify::{ensure_green, run_verification};

#[derive(Debug)]
pub struct CommitOutcome {
    pub message: CommitMessage,
    pub report: VerificationReport,
}

/// Nothing is staged unless the message passes the conventions and every
/// check is green.
pub async fn commit_changes(
    ctx: &AppContext,
    message: &str,
    targeted_file: Option<&str>,
) -> AppResult<CommitOutcome> {
    let current = ctx.version_control.current_branch().await?;
    if current == ctx.config.main_branch {
        return Err(AppError::Convention(format!(
            "refusing to commit on '{current}'; run `handoff start <TICKET>` first"
        )));
    }

    let ticket = match BranchName::parse(&current) {
        Ok(branch) => branch.ticket_id(),
        Err(_) => {
            warn!(branch = %current, "branch does not follow the ticket naming convention");
            None
        }
    };
    let message = CommitMessage::parse(message, ticket.as_ref())?;

    let report = run_verification(ctx, targeted_file).await?;
    ensure_green(&report)?;

    ctx.version_control.stage_all().await?;
    ctx.version_control.commit(&message).await?;
    info!(message = %message, "changes committed");

    Ok(CommitOutcome { message, report })
}
