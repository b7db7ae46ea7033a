//! Lenient JSON parsing for language-model output.
//!
//! Models wrap JSON in markdown fences, chatty preambles, and sign-offs, and
//! occasionally emit JSON5-ish syntax or stop mid-object when they hit their
//! token limit. [`parse_json`] peels those layers off one at a time and only
//! falls back to repairing the text when every strict attempt fails.

mod diagnostics;
mod json;
mod repair;

use thiserror::Error;

pub use json::{ParseOutcome, parse_json, parse_json_detailed};

/// Raised when text cannot be turned into JSON, even after repair.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
    raw_output: Option<String>,
    #[source]
    original: Option<serde_json::Error>,
}

impl ParseError {
    pub(crate) fn new(
        message: String,
        raw_output: Option<String>,
        original: Option<serde_json::Error>,
    ) -> Self {
        Self {
            message,
            raw_output,
            original,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The start of the input that failed to parse.
    pub fn raw_output(&self) -> Option<&str> {
        self.raw_output.as_deref()
    }

    /// The decode error from the first, unmodified parse attempt.
    pub fn original(&self) -> Option<&serde_json::Error> {
        self.original.as_ref()
    }
}
