use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::publish::{DocsFollowUp, PublishOptions, publish};

#[derive(Args, Debug, Clone)]
pub struct PrArgs {
    /// Summary paragraph for the pull request description.
    #[arg(short, long)]
    pub summary: Option<String>,
    /// Base branch; defaults to the configured main branch.
    #[arg(short, long)]
    pub base: Option<String>,
    /// Skip the documentation update.
    #[arg(long)]
    pub skip_docs: bool,
    /// Test file to run before the full suite.
    #[arg(long = "test-file")]
    pub test_file: Option<String>,
}

pub async fn run(ctx: &AppContext, args: PrArgs) -> AppResult<()> {
    let outcome = publish(
        ctx,
        PublishOptions {
            summary: args.summary,
            base: args.base,
            skip_docs: args.skip_docs,
            targeted_file: args.test_file,
        },
    )
    .await?;

    println!("Pushed {}", outcome.branch);
    println!(
        "Pull request #{} opened: {}",
        outcome.pull_request.number, outcome.pull_request.url
    );

    match outcome.docs {
        DocsFollowUp::NotNeeded(kind) => {
            println!("No docs update needed for a '{}' change.", kind.as_str())
        }
        DocsFollowUp::SkippedByUser => println!("Docs update skipped."),
        DocsFollowUp::Reminder => {
            println!("Reminder: update the documentation for this user-facing change.")
        }
        DocsFollowUp::Ran(outcome) if outcome.passed() => {
            println!("Docs updated with `{}`.", outcome.command)
        }
        DocsFollowUp::Ran(outcome) => {
            println!("Docs command `{}` failed:", outcome.command);
            println!("{}", outcome.output_tail);
        }
    }
    Ok(())
}
