use clap::{Args, Subcommand};

use crate::domain::branch::BranchName;
use crate::domain::commit::CommitMessage;
use crate::domain::ticket::TicketId;
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(subcommand)]
    pub command: CheckCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CheckCommand {
    /// Lint a commit message against the commit conventions.
    Commit {
        message: String,
        /// Ticket the change belongs to; its id must not appear in the message.
        #[arg(short, long)]
        ticket: Option<String>,
    },
    /// Check a branch name against `{TICKET-ID}-{short-description}`.
    Branch { name: String },
}

pub fn run(command: CheckCommand) -> AppResult<()> {
    match command {
        CheckCommand::Commit { message, ticket } => check_commit(&message, ticket.as_deref()),
        CheckCommand::Branch { name } => check_branch(&name),
    }
}

fn check_commit(message: &str, ticket: Option<&str>) -> AppResult<()> {
    let ticket = ticket.map(TicketId::parse).transpose()?;
    let violations = CommitMessage::lint(message, ticket.as_ref());
    if violations.is_empty() {
        println!("Commit message ok.");
        return Ok(());
    }

    for violation in &violations {
        println!("- {violation}");
    }
    Err(AppError::Convention(format!(
        "commit message has {} problem(s)",
        violations.len()
    )))
}

fn check_branch(name: &str) -> AppResult<()> {
    let branch = BranchName::parse(name)?;
    match branch.ticket_id() {
        Some(ticket) => println!("Branch ok (ticket {ticket})."),
        None => println!("Branch ok."),
    }
    Ok(())
}
