use tracing::debug;

use crate::cache::HandoffDraftCache;
use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::change::HandoffDraft;
use crate::domain::commit::{CommitMessage, CommitViolation};
use crate::domain::ticket::TicketId;
use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct DraftOutcome {
    pub draft: HandoffDraft,
    /// Where the proposed commit message departs from the conventions.
    pub violations: Vec<CommitViolation>,
    pub cached: bool,
}

/// Asks the language model to describe the working-tree changes. Drafts are
/// looked up in and written to `cache` when one is given.
pub async fn draft_handoff(
    ctx: &AppContext,
    cache: Option<&mut HandoffDraftCache>,
) -> AppResult<DraftOutcome> {
    let changes = ctx.version_control.summarize_changes().await?;
    if changes.is_empty() {
        return Err(AppError::VersionControl(
            "no uncommitted changes to describe".to_string(),
        ));
    }

    let ticket_id = ctx
        .version_control
        .current_branch()
        .await
        .ok()
        .and_then(|branch| BranchName::parse(&branch).ok())
        .and_then(|branch| branch.ticket_id());
    let key = HandoffDraftCache::compute_key(&changes, ticket_id.as_ref().map(TicketId::as_str));

    let cached = cache.as_ref().and_then(|cache| cache.get(&key));
    let (draft, was_cached) = match cached {
        Some(draft) => {
            debug!("using cached handoff draft");
            (draft, true)
        }
        None => {
            let ticket = match &ticket_id {
                Some(id) => match ctx.issue_tracker.fetch_ticket(id).await {
                    Ok(ticket) => Some(ticket),
                    Err(err) => {
                        debug!(error = %err, "drafting without ticket details");
                        None
                    }
                },
                None => None,
            };
            let draft = ctx
                .language_model
                .draft_handoff(&changes, ticket.as_ref())
                .await?;
            if let Some(cache) = cache {
                cache.insert(key, &draft);
            }
            (draft, false)
        }
    };

    let violations = CommitMessage::lint(&draft.commit_message, ticket_id.as_ref());
    Ok(DraftOutcome {
        draft,
        violations,
        cached: was_cached,
    })
}
