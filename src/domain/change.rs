use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct ChangeSummary {
    pub files_changed: usize,
    /// `git diff --stat` output.
    pub summary: String,
    pub diff: String,
}

impl ChangeSummary {
    pub fn empty() -> Self {
        Self {
            files_changed: 0,
            summary: String::new(),
            diff: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files_changed == 0 && self.diff.trim().is_empty()
    }
}

/// What a language model proposes for committing and shipping a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffDraft {
    pub commit_message: String,
    pub branch_summary: String,
    pub pr_summary: String,
}
