use clap::Args;
use tracing::warn;

use crate::cache::HandoffDraftCache;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::draft::draft_handoff;

#[derive(Args, Debug, Clone)]
pub struct DraftArgs {
    /// Ask the language model even when a cached draft exists.
    #[arg(long)]
    pub no_cache: bool,
}

pub async fn run(ctx: &AppContext, args: DraftArgs) -> AppResult<()> {
    let mut cache = if args.no_cache {
        None
    } else {
        Some(HandoffDraftCache::load()?)
    };

    let outcome = draft_handoff(ctx, cache.as_mut()).await?;

    if let Some(cache) = cache.as_ref().filter(|_| !outcome.cached) {
        if let Err(err) = cache.save() {
            warn!(path = %cache.path().display(), error = %err, "failed to save draft cache");
        }
    }

    println!("Commit message: {}", outcome.draft.commit_message);
    println!("Branch summary: {}", outcome.draft.branch_summary);
    if !outcome.draft.pr_summary.trim().is_empty() {
        println!("\nPull request summary:\n{}", outcome.draft.pr_summary.trim());
    }
    if !outcome.violations.is_empty() {
        println!("\nThe proposed commit message needs editing:");
        for violation in &outcome.violations {
            println!("- {violation}");
        }
    }
    Ok(())
}
