use std::io;

use thiserror::Error;

use crate::parse::ParseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("code host error: {0}")]
    CodeHost(String),
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error("convention violation: {0}")]
    Convention(String),
    #[error("{step} failed: {detail}")]
    Verification { step: String, detail: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
