use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::commit::{CommitMessage, CommitType};
use crate::domain::pull_request::{PullRequest, PullRequestDraft};
use crate::domain::verification::{CheckCommand, CheckKind, CheckOutcome};
use crate::error::{AppError, AppResult};
use crate::workflow::verify::{ensure_green, run_verification};

#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    pub summary: Option<String>,
    pub base: Option<String>,
    pub skip_docs: bool,
    pub targeted_file: Option<String>,
}

#[derive(Debug)]
pub enum DocsFollowUp {
    /// Internal-only or test-only change.
    NotNeeded(CommitType),
    SkippedByUser,
    /// User-facing change but no docs command is configured.
    Reminder,
    Ran(CheckOutcome),
}

#[derive(Debug)]
pub struct PublishOutcome {
    pub branch: BranchName,
    pub pull_request: PullRequest,
    pub docs: DocsFollowUp,
}

pub async fn publish(ctx: &AppContext, options: PublishOptions) -> AppResult<PublishOutcome> {
    let branch = BranchName::parse(&ctx.version_control.current_branch().await?)?;
    let ticket = branch.ticket_id().ok_or_else(|| {
        AppError::Convention(format!("branch '{branch}' does not name a ticket"))
    })?;

    let subject = ctx.version_control.last_commit_subject().await?;
    let commit = CommitMessage::parse(&subject, Some(&ticket))?;

    let report = run_verification(ctx, options.targeted_file.as_deref()).await?;
    ensure_green(&report)?;

    ctx.version_control.push(&branch).await?;

    let base = options
        .base
        .as_deref()
        .unwrap_or(ctx.config.main_branch.as_str());
    let draft = PullRequestDraft::new(
        &commit,
        &ticket,
        options.summary.as_deref().unwrap_or_default(),
        branch.clone(),
        base,
    );
    let pull_request = ctx.code_host.create_pull_request(&draft).await?;
    info!(url = %pull_request.url, "pull request created");

    let docs = follow_up_docs(ctx, commit.kind, options.skip_docs).await?;

    Ok(PublishOutcome {
        branch,
        pull_request,
        docs,
    })
}

/// The pull request already exists here, so a failing docs command is
/// reported rather than returned as an error.
async fn follow_up_docs(
    ctx: &AppContext,
    kind: CommitType,
    skip: bool,
) -> AppResult<DocsFollowUp> {
    if !kind.needs_docs_follow_up() {
        return Ok(DocsFollowUp::NotNeeded(kind));
    }
    if skip {
        return Ok(DocsFollowUp::SkippedByUser);
    }
    let Some(command_line) = ctx.config.docs_command.as_deref() else {
        return Ok(DocsFollowUp::Reminder);
    };

    let command = CheckCommand::parse(CheckKind::Docs, command_line)?;
    let outcome = ctx.checks.run(&command).await?;
    if !outcome.passed() {
        warn!(command = %outcome.command, "docs update failed");
    }
    Ok(DocsFollowUp::Ran(outcome))
}
