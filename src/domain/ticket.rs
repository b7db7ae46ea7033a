use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};

static TICKET_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Z0-9]*-[0-9]+$").expect("TICKET_ID_RE regex should compile")
});

/// Matches ticket-shaped tokens inside free text.
static TICKET_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z][A-Za-z0-9]*-[0-9]+\b").expect("TICKET_TOKEN_RE regex should compile")
});

/// An issue tracker key such as `HG-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketId(String);

impl TicketId {
    pub fn parse(value: &str) -> AppResult<Self> {
        let normalized = value.trim().to_uppercase();
        if TICKET_ID_RE.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(AppError::Convention(format!(
                "'{}' is not a ticket id (expected PROJECT-NUMBER, e.g. HG-1)",
                value.trim()
            )))
        }
    }

    /// The first ticket-shaped token in `text`, if any.
    pub fn find_in(text: &str) -> Option<Self> {
        TICKET_TOKEN_RE
            .find_iter(text)
            .find_map(|token| Self::parse(token.as_str()).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn project(&self) -> &str {
        self.0.split_once('-').map_or(self.0.as_str(), |(project, _)| project)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
}

impl Ticket {
    /// A ticket known only by id and a summary typed by the user.
    pub fn local(id: TicketId, title: &str) -> Self {
        Self {
            id,
            title: title.trim().to_string(),
            description: String::new(),
            url: None,
        }
    }
}
