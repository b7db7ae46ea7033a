use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ticket::TicketId;
use crate::error::{AppError, AppResult};

const MAX_SLUG_LEN: usize = 40;

static BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>(?:[A-Za-z0-9_-][A-Za-z0-9._-]*/)*)(?P<ticket>[A-Z][A-Z0-9]*-[0-9]+)-(?P<slug>[a-z0-9]+(?:-[a-z0-9]+)*)$")
        .expect("BRANCH_RE regex should compile")
});

/// A feature branch named `{ticket}-{short-description}`, optionally under a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_parts(ticket: &TicketId, summary: &str) -> Self {
        Self(format!("{}-{}", ticket, slugify(summary)))
    }

    /// `prefix` may hold several `/`-separated segments; characters git or
    /// [`BranchName::parse`] would reject are replaced with `-`.
    pub fn with_prefix(ticket: &TicketId, summary: &str, prefix: &str) -> Self {
        let prefix = normalize_prefix(prefix);
        if prefix.is_empty() {
            return Self::from_parts(ticket, summary);
        }
        Self(format!("{prefix}/{}-{}", ticket, slugify(summary)))
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        let value = value.trim();
        if BRANCH_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(AppError::Convention(format!(
                "branch '{value}' does not follow {{TICKET-ID}}-{{short-description}} (e.g. HG-1-add-login)"
            )))
        }
    }

    pub fn ticket_id(&self) -> Option<TicketId> {
        let captures = BRANCH_RE.captures(&self.0)?;
        TicketId::parse(captures.name("ticket")?.as_str()).ok()
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    prefix
        .split('/')
        .map(|segment| {
            let clean = segment
                .trim()
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                        c
                    } else {
                        '-'
                    }
                })
                .collect::<String>();
            clean.trim_matches(|c| c == '-' || c == '.').to_string()
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn slugify(input: &str) -> String {
    let clean = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>();

    let mut words = clean.split('-').filter(|word| !word.is_empty());
    let mut result = String::with_capacity(MAX_SLUG_LEN);
    if let Some(first) = words.next() {
        result.push_str(&first[..first.len().min(MAX_SLUG_LEN)]);
    }
    for word in words {
        if result.len() + 1 + word.len() > MAX_SLUG_LEN {
            break;
        }
        result.push('-');
        result.push_str(word);
    }

    if result.is_empty() {
        "summary".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(value: &str) -> TicketId {
        TicketId::parse(value).unwrap()
    }

    #[test]
    fn slugifies_branch_name() {
        let name = BranchName::from_parts(&ticket("HG-12"), "Add Git integration for checkout");
        assert_eq!(name.as_str(), "HG-12-add-git-integration-for-checkout");
    }

    #[test]
    fn collapses_symbols_and_spaces() {
        let name = BranchName::from_parts(&ticket("HG-3"), "  Fix   [URGENT] @#$ login---flow ");
        assert_eq!(name.as_str(), "HG-3-fix-urgent-login-flow");
    }

    #[test]
    fn truncates_at_word_boundary() {
        let name = BranchName::from_parts(
            &ticket("HG-4"),
            "Fix doctor JSON mode currently non-functional in production builds",
        );
        assert_eq!(name.as_str(), "HG-4-fix-doctor-json-mode-currently-non");
        assert!(name.as_str().len() <= "HG-4-".len() + MAX_SLUG_LEN);
    }

    #[test]
    fn empty_summary_falls_back() {
        let name = BranchName::from_parts(&ticket("HG-5"), "!!!");
        assert_eq!(name.as_str(), "HG-5-summary");
    }

    #[test]
    fn prefixes_branch() {
        let name = BranchName::with_prefix(&ticket("HG-6"), "Add CLI", "feature/");
        assert_eq!(name.as_str(), "feature/HG-6-add-cli");
        assert_eq!(name.ticket_id(), Some(ticket("HG-6")));
    }

    #[test]
    fn prefixed_branches_parse_back() {
        let prefixes = [
            "feature",
            "Feature",
            "users/alice",
            "/team//bugfix/",
            "my feature",
            "release/v1.2",
            " .hidden ",
        ];
        for prefix in prefixes {
            let name = BranchName::with_prefix(&ticket("HG-1"), "add login", prefix);
            let parsed = BranchName::parse(name.as_str())
                .unwrap_or_else(|err| panic!("{prefix:?} -> {name}: {err}"));
            assert_eq!(parsed.ticket_id(), Some(ticket("HG-1")), "{prefix:?}");
        }
    }

    #[test]
    fn normalizes_prefix_segments() {
        let name = |prefix| BranchName::with_prefix(&ticket("HG-2"), "fix it", prefix);
        assert_eq!(name("users/alice").as_str(), "users/alice/HG-2-fix-it");
        assert_eq!(name("/team//bugfix/").as_str(), "team/bugfix/HG-2-fix-it");
        assert_eq!(name("my feature").as_str(), "my-feature/HG-2-fix-it");
        assert_eq!(name(" / ").as_str(), "HG-2-fix-it");
    }

    #[test]
    fn parses_and_extracts_ticket() {
        let branch = BranchName::parse("HG-1-add-login").unwrap();
        assert_eq!(branch.ticket_id(), Some(ticket("HG-1")));
    }

    #[test]
    fn rejects_off_convention_branches() {
        for value in ["main", "add-login", "HG-1", "HG-1-Add-Login", "hg-1-add-login", "HG-1--x"] {
            assert!(BranchName::parse(value).is_err(), "accepted {value:?}");
        }
    }
}
