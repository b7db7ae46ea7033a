use clap::Args;

use crate::cmd::verify::print_report;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::commit::commit_changes;

#[derive(Args, Debug, Clone)]
pub struct CommitArgs {
    /// One-line Conventional Commits message.
    #[arg(short, long)]
    pub message: String,
    /// Test file to run before the full suite.
    #[arg(long = "test-file")]
    pub test_file: Option<String>,
}

pub async fn run(ctx: &AppContext, args: CommitArgs) -> AppResult<()> {
    let outcome = commit_changes(ctx, &args.message, args.test_file.as_deref()).await?;

    print_report(&outcome.report);
    println!("Committed: {}", outcome.message);
    println!("Next: `handoff pr` to push and open the pull request.");
    Ok(())
}
