use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::start::start_ticket;

#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Ticket id, e.g. HG-1.
    pub ticket: String,
    /// Short description for the branch name; skips the tracker lookup.
    #[arg(short, long)]
    pub summary: Option<String>,
}

pub async fn run(ctx: &AppContext, args: StartArgs) -> AppResult<()> {
    let outcome = start_ticket(ctx, &args.ticket, args.summary.as_deref()).await?;

    println!("Ticket {}: {}", outcome.ticket.id, outcome.ticket.title);
    if let Some(url) = &outcome.ticket.url {
        println!("View ticket: {url}");
    }
    println!("Branch ready: {}", outcome.branch);
    println!("Next: scope the change with the user before writing code.");
    Ok(())
}
