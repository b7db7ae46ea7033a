//! In-memory service doubles for workflow tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{AppConfig, StoredConfig};
use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::change::{ChangeSummary, HandoffDraft};
use crate::domain::commit::CommitMessage;
use crate::domain::pull_request::{PullRequest, PullRequestDraft};
use crate::domain::ticket::{Ticket, TicketId};
use crate::domain::verification::{CheckCommand, CheckKind, CheckOutcome, CheckStatus};
use crate::error::{AppError, AppResult};
use crate::services::{
    CheckRunner, CodeHostService, IssueTrackerService, LanguageModelService, VersionControlService,
};

#[derive(Default)]
pub struct FakeVcs {
    pub calls: Mutex<Vec<String>>,
    pub branch: Mutex<String>,
    pub last_subject: Mutex<String>,
    pub changes: Mutex<Option<ChangeSummary>>,
}

impl FakeVcs {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionControlService for FakeVcs {
    async fn summarize_changes(&self) -> AppResult<ChangeSummary> {
        Ok(self
            .changes
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(ChangeSummary::empty))
    }

    async fn sync_main(&self, main: &str) -> AppResult<()> {
        self.record(format!("sync_main {main}"));
        Ok(())
    }

    async fn create_branch(&self, branch: &BranchName) -> AppResult<()> {
        self.record(format!("create_branch {branch}"));
        *self.branch.lock().unwrap() = branch.to_string();
        Ok(())
    }

    async fn current_branch(&self) -> AppResult<String> {
        Ok(self.branch.lock().unwrap().clone())
    }

    async fn last_commit_subject(&self) -> AppResult<String> {
        Ok(self.last_subject.lock().unwrap().clone())
    }

    async fn stage_all(&self) -> AppResult<()> {
        self.record("stage_all".to_string());
        Ok(())
    }

    async fn commit(&self, message: &CommitMessage) -> AppResult<()> {
        self.record(format!("commit {message}"));
        *self.last_subject.lock().unwrap() = message.to_string();
        Ok(())
    }

    async fn push(&self, branch: &BranchName) -> AppResult<()> {
        self.record(format!("push {branch}"));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTracker {
    pub unavailable: bool,
}

#[async_trait]
impl IssueTrackerService for FakeTracker {
    async fn fetch_ticket(&self, id: &TicketId) -> AppResult<Ticket> {
        if self.unavailable {
            return Err(AppError::Configuration("Jira base URL not configured".to_string()));
        }
        Ok(Ticket {
            id: id.clone(),
            title: "Add login form".to_string(),
            description: "Users need to sign in.".to_string(),
            url: Some(format!("https://tracker.example/browse/{id}")),
        })
    }
}

#[derive(Default)]
pub struct FakeCodeHost {
    pub created: Mutex<Vec<PullRequestDraft>>,
}

#[async_trait]
impl CodeHostService for FakeCodeHost {
    async fn create_pull_request(&self, draft: &PullRequestDraft) -> AppResult<PullRequest> {
        let mut created = self.created.lock().unwrap();
        created.push(draft.clone());
        Ok(PullRequest {
            number: created.len() as u64,
            url: format!("https://github.example/pull/{}", created.len()),
        })
    }
}

pub struct FakeModel {
    pub draft: HandoffDraft,
    pub calls: AtomicUsize,
}

impl Default for FakeModel {
    fn default() -> Self {
        Self {
            draft: HandoffDraft {
                commit_message: "feat: add login form".to_string(),
                branch_summary: "add login form".to_string(),
                pr_summary: "Adds the login form.".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeModel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModelService for FakeModel {
    async fn draft_handoff(
        &self,
        _changes: &ChangeSummary,
        _ticket: Option<&Ticket>,
    ) -> AppResult<HandoffDraft> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.draft.clone())
    }
}

#[derive(Default)]
pub struct FakeChecks {
    pub failing: Option<CheckKind>,
    pub ran: Mutex<Vec<CheckCommand>>,
}

impl FakeChecks {
    pub fn failing(kind: CheckKind) -> Self {
        Self {
            failing: Some(kind),
            ..Self::default()
        }
    }

    pub fn ran_kinds(&self) -> Vec<CheckKind> {
        self.ran.lock().unwrap().iter().map(|check| check.kind).collect()
    }
}

#[async_trait]
impl CheckRunner for FakeChecks {
    async fn run(&self, command: &CheckCommand) -> AppResult<CheckOutcome> {
        self.ran.lock().unwrap().push(command.clone());
        let status = if self.failing == Some(command.kind) {
            CheckStatus::Failed { exit_code: Some(1) }
        } else {
            CheckStatus::Passed
        };
        Ok(CheckOutcome {
            kind: command.kind,
            command: command.command_line(),
            status,
            output_tail: "test result: FAILED. 1 failed".to_string(),
        })
    }
}

#[derive(Default)]
pub struct Fakes {
    pub vcs: Arc<FakeVcs>,
    pub tracker: Arc<FakeTracker>,
    pub code_host: Arc<FakeCodeHost>,
    pub model: Arc<FakeModel>,
    pub checks: Arc<FakeChecks>,
}

impl Fakes {
    pub fn on_branch(self, branch: &str) -> Self {
        *self.vcs.branch.lock().unwrap() = branch.to_string();
        self
    }

    pub fn context(&self, stored: StoredConfig) -> AppContext {
        AppContext::new(
            AppConfig::resolve(stored, Path::new("/workspace"), |_| None),
            self.vcs.clone(),
            self.tracker.clone(),
            self.code_host.clone(),
            self.model.clone(),
            self.checks.clone(),
        )
    }
}
