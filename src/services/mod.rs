pub mod check_runner;
pub mod code_host;
pub mod issue_tracker;
pub mod language_model;
pub mod version_control;

pub use check_runner::CheckRunner;
pub use code_host::CodeHostService;
pub use issue_tracker::IssueTrackerService;
pub use language_model::LanguageModelService;
pub use version_control::{BranchingStrategy, VersionControlService};
