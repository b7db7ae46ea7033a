use crate::domain::branch::BranchName;
use crate::domain::commit::CommitMessage;
use crate::domain::ticket::TicketId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    pub head: BranchName,
    pub base: String,
}

impl PullRequestDraft {
    /// The title mirrors the commit subject; the body carries the ticket id.
    pub fn new(
        commit: &CommitMessage,
        ticket: &TicketId,
        summary: &str,
        head: BranchName,
        base: &str,
    ) -> Self {
        Self {
            title: commit.to_string(),
            body: render_body(ticket, summary, &commit.description),
            head,
            base: base.to_string(),
        }
    }
}

fn render_body(ticket: &TicketId, summary: &str, fallback: &str) -> String {
    let summary = summary.trim();
    let summary = if summary.is_empty() { fallback } else { summary };
    format!("Ticket: {ticket}\n\n## Summary\n\n{summary}\n")
}

#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commit::CommitType;

    #[test]
    fn drafts_from_commit_and_ticket() {
        let ticket = TicketId::parse("HG-1").unwrap();
        let commit = CommitMessage::new(CommitType::Feat, "add login");
        let head = BranchName::from_parts(&ticket, "add login");
        let draft = PullRequestDraft::new(&commit, &ticket, "Adds a login form.", head, "main");

        assert_eq!(draft.title, "feat: add login");
        assert_eq!(draft.body, "Ticket: HG-1\n\n## Summary\n\nAdds a login form.\n");
        assert_eq!(draft.head.as_str(), "HG-1-add-login");
        assert_eq!(draft.base, "main");
    }

    #[test]
    fn falls_back_to_commit_description() {
        let ticket = TicketId::parse("HG-2").unwrap();
        let commit = CommitMessage::new(CommitType::Fix, "handle empty input");
        let head = BranchName::from_parts(&ticket, "empty input");
        let draft = PullRequestDraft::new(&commit, &ticket, "  ", head, "main");
        assert!(draft.body.ends_with("## Summary\n\nhandle empty input\n"));
    }
}
