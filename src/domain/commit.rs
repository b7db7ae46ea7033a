use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ticket::TicketId;
use crate::error::{AppError, AppResult};

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<kind>[A-Za-z]+)(?:\((?P<scope>[^()\s]+)\))?(?P<breaking>!)?:(?P<space>\s*)(?P<description>.*)$")
        .expect("HEADER_RE regex should compile")
});

static TICKET_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2,}[A-Z0-9]*)-[0-9]+\b").expect("TICKET_REF_RE regex should compile")
});

/// Upper-case identifiers that look like ticket keys but are not.
const TECHNICAL_PREFIXES: &[&str] = &["UTF", "SHA", "ISO", "RFC", "CVE", "TLS", "HTTP", "IPV", "AES"];

/// Third-person forms of verbs that open commit subjects.
const THIRD_PERSON_VERBS: &[&str] = &[
    "adds", "bumps", "changes", "cleans", "creates", "deletes", "fixes", "handles", "implements",
    "improves", "makes", "moves", "refactors", "removes", "renames", "replaces", "supports",
    "updates", "uses",
];

/// Words ending in `-ed`/`-ing` that are already imperative.
const IMPERATIVE_EXCEPTIONS: &[&str] = &[
    "bring", "embed", "feed", "need", "ping", "proceed", "seed", "shed", "speed", "string",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Test,
    Refactor,
    Chore,
}

impl CommitType {
    pub const ALL: [CommitType; 6] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Test,
        CommitType::Refactor,
        CommitType::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Test => "test",
            CommitType::Refactor => "refactor",
            CommitType::Chore => "chore",
        }
    }

    pub fn from_prefix(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Internal-only and test-only changes skip the documentation follow-up.
    pub fn needs_docs_follow_up(&self) -> bool {
        matches!(self, CommitType::Feat | CommitType::Fix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitViolation {
    Empty,
    MultiLine,
    MissingType,
    UnknownType(String),
    EmptyDescription,
    MissingSpace,
    NotImperative(String),
    CoAuthorTrailer,
    TicketReference(String),
}

impl fmt::Display for CommitViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitViolation::Empty => write!(f, "commit message is empty"),
            CommitViolation::MultiLine => write!(f, "commit message must be a single line"),
            CommitViolation::MissingType => {
                write!(f, "commit message must start with '<type>: ' (feat, fix, docs, test, refactor, chore)")
            }
            CommitViolation::UnknownType(kind) => write!(
                f,
                "unknown commit type '{kind}' (use feat, fix, docs, test, refactor or chore)"
            ),
            CommitViolation::EmptyDescription => write!(f, "commit description is empty"),
            CommitViolation::MissingSpace => {
                write!(f, "put a space between '<type>:' and the description")
            }
            CommitViolation::NotImperative(word) => {
                write!(f, "use the imperative mood ('{word}' reads as past or present tense)")
            }
            CommitViolation::CoAuthorTrailer => {
                write!(f, "remove the Co-authored-by trailer")
            }
            CommitViolation::TicketReference(id) => write!(
                f,
                "do not embed ticket id '{id}' in the commit message; the pull request references it"
            ),
        }
    }
}

/// A single-line Conventional Commits subject: `type[(scope)][!]: description`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub kind: CommitType,
    pub scope: Option<String>,
    pub breaking: bool,
    pub description: String,
}

impl CommitMessage {
    pub fn new(kind: CommitType, description: &str) -> Self {
        Self {
            kind,
            scope: None,
            breaking: false,
            description: description.trim().to_string(),
        }
    }

    pub fn parse(message: &str, ticket: Option<&TicketId>) -> AppResult<Self> {
        let violations = Self::lint(message, ticket);
        if !violations.is_empty() {
            let detail = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::Convention(detail));
        }

        let captures = HEADER_RE
            .captures(message.trim())
            .ok_or_else(|| AppError::Convention(CommitViolation::MissingType.to_string()))?;
        let kind = CommitType::from_prefix(&captures["kind"])
            .ok_or_else(|| AppError::Convention(CommitViolation::MissingType.to_string()))?;

        Ok(Self {
            kind,
            scope: captures.name("scope").map(|scope| scope.as_str().to_string()),
            breaking: captures.name("breaking").is_some(),
            description: captures["description"].trim().to_string(),
        })
    }

    /// Every way `message` departs from the commit conventions.
    pub fn lint(message: &str, ticket: Option<&TicketId>) -> Vec<CommitViolation> {
        let message = message.trim();
        if message.is_empty() {
            return vec![CommitViolation::Empty];
        }

        let mut violations = Vec::new();
        if message.lines().count() > 1 {
            violations.push(CommitViolation::MultiLine);
        }
        if message
            .lines()
            .any(|line| line.trim().to_lowercase().starts_with("co-authored-by:"))
        {
            violations.push(CommitViolation::CoAuthorTrailer);
        }

        let header = message.lines().next().unwrap_or_default();
        if let Some(id) = embedded_ticket(header, ticket) {
            violations.push(CommitViolation::TicketReference(id));
        }

        let Some(captures) = HEADER_RE.captures(header) else {
            violations.push(CommitViolation::MissingType);
            return violations;
        };

        let kind = &captures["kind"];
        if CommitType::from_prefix(kind).is_none() {
            violations.push(CommitViolation::UnknownType(kind.to_string()));
        }

        let description = captures["description"].trim();
        if !description.is_empty() && captures["space"].is_empty() {
            violations.push(CommitViolation::MissingSpace);
        }
        match description.split_whitespace().next() {
            None => violations.push(CommitViolation::EmptyDescription),
            Some(first) if !is_imperative(first) => {
                violations.push(CommitViolation::NotImperative(first.to_string()))
            }
            Some(_) => {}
        }

        violations
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(scope) = &self.scope {
            write!(f, "({scope})")?;
        }
        if self.breaking {
            f.write_str("!")?;
        }
        write!(f, ": {}", self.description)
    }
}

fn embedded_ticket(header: &str, ticket: Option<&TicketId>) -> Option<String> {
    if let Some(ticket) = ticket {
        let whole_token = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(ticket.as_str())));
        if whole_token.is_ok_and(|re| re.is_match(header)) {
            return Some(ticket.to_string());
        }
    }
    TICKET_REF_RE
        .captures_iter(header)
        .find(|captures| !TECHNICAL_PREFIXES.contains(&&captures[1]))
        .map(|captures| captures[0].to_string())
}

fn is_imperative(word: &str) -> bool {
    let word = word.to_lowercase();
    if IMPERATIVE_EXCEPTIONS.contains(&word.as_str()) {
        return true;
    }
    if THIRD_PERSON_VERBS.contains(&word.as_str()) {
        return false;
    }
    let past = word.len() > 3 && word.ends_with("ed");
    let gerund = word.len() > 4 && word.ends_with("ing");
    !(past || gerund)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_conventional_subject() {
        let message = CommitMessage::parse("feat(cli)!: add handoff guide", None).unwrap();
        assert_eq!(message.kind, CommitType::Feat);
        assert_eq!(message.scope.as_deref(), Some("cli"));
        assert!(message.breaking);
        assert_eq!(message.description, "add handoff guide");
        assert_eq!(message.to_string(), "feat(cli)!: add handoff guide");
    }

    #[test]
    fn accepts_every_type() {
        for kind in CommitType::ALL {
            let subject = format!("{}: update the thing", kind.as_str());
            assert!(CommitMessage::lint(&subject, None).is_empty(), "{subject}");
        }
    }

    #[test]
    fn flags_missing_and_unknown_types() {
        assert_eq!(
            CommitMessage::lint("add login", None),
            vec![CommitViolation::MissingType]
        );
        assert_eq!(
            CommitMessage::lint("feature: add login", None),
            vec![CommitViolation::UnknownType("feature".to_string())]
        );
        assert_eq!(
            CommitMessage::lint("Feat: add login", None),
            vec![CommitViolation::UnknownType("Feat".to_string())]
        );
    }

    #[test]
    fn flags_non_imperative_mood() {
        assert_eq!(
            CommitMessage::lint("fix: fixed the parser", None),
            vec![CommitViolation::NotImperative("fixed".to_string())]
        );
        assert_eq!(
            CommitMessage::lint("feat: adding retries", None),
            vec![CommitViolation::NotImperative("adding".to_string())]
        );
        assert_eq!(
            CommitMessage::lint("fix: Fixes the parser", None),
            vec![CommitViolation::NotImperative("Fixes".to_string())]
        );
        assert!(CommitMessage::lint("feat: embed the schema", None).is_empty());
        assert!(CommitMessage::lint("fix: address review notes", None).is_empty());
    }

    #[test]
    fn flags_multi_line_and_trailer() {
        let violations = CommitMessage::lint(
            "feat: add login\n\nCo-authored-by: Someone <someone@example.com>",
            None,
        );
        assert_eq!(
            violations,
            vec![CommitViolation::MultiLine, CommitViolation::CoAuthorTrailer]
        );
    }

    #[test]
    fn flags_ticket_ids() {
        let ticket = TicketId::parse("HG-1").unwrap();
        assert_eq!(
            CommitMessage::lint("feat: add login for hg-1", Some(&ticket)),
            vec![CommitViolation::TicketReference("HG-1".to_string())]
        );
        assert_eq!(
            CommitMessage::lint("fix: handle ABC-42 edge case", None),
            vec![CommitViolation::TicketReference("ABC-42".to_string())]
        );
        assert!(CommitMessage::lint("fix: reject invalid UTF-8 input", None).is_empty());
    }

    #[test]
    fn active_ticket_matches_whole_tokens_only() {
        let tf = TicketId::parse("TF-8").unwrap();
        assert!(CommitMessage::lint("fix: reject invalid utf-8 input", Some(&tf)).is_empty());

        let hg = TicketId::parse("HG-1").unwrap();
        assert_eq!(
            CommitMessage::lint("fix: handle HG-12 regression", Some(&hg)),
            vec![CommitViolation::TicketReference("HG-12".to_string())]
        );
        assert_eq!(
            CommitMessage::lint("fix: close (hg-1) loop", Some(&hg)),
            vec![CommitViolation::TicketReference("HG-1".to_string())]
        );
    }

    #[test]
    fn flags_empty_messages() {
        assert_eq!(CommitMessage::lint("   ", None), vec![CommitViolation::Empty]);
        assert_eq!(
            CommitMessage::lint("feat: ", None),
            vec![CommitViolation::EmptyDescription]
        );
        assert_eq!(
            CommitMessage::lint("feat(cli):", None),
            vec![CommitViolation::EmptyDescription]
        );
    }

    #[test]
    fn requires_space_after_colon() {
        assert_eq!(
            CommitMessage::lint("feat:add login", None),
            vec![CommitViolation::MissingSpace]
        );
        assert!(CommitMessage::parse("feat:add login", None).is_err());
    }

    #[test]
    fn parse_reports_all_violations() {
        let err = CommitMessage::parse("feature: added login", None).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("unknown commit type 'feature'"));
        assert!(text.contains("imperative mood"));
    }

    #[test]
    fn docs_follow_up_only_for_user_facing_changes() {
        assert!(CommitType::Feat.needs_docs_follow_up());
        assert!(CommitType::Fix.needs_docs_follow_up());
        assert!(!CommitType::Test.needs_docs_follow_up());
        assert!(!CommitType::Chore.needs_docs_follow_up());
        assert!(!CommitType::Refactor.needs_docs_follow_up());
    }
}
