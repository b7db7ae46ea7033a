pub mod git;
pub mod github;
pub mod jira;
pub mod llm;
pub mod shell;
