/// The ordered steps for taking a ticket from tracker to merged PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    GatherContext,
    Scope,
    Branch,
    Implement,
    Verify,
    Commit,
    PullRequest,
    UpdateDocs,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 8] = [
        WorkflowStep::GatherContext,
        WorkflowStep::Scope,
        WorkflowStep::Branch,
        WorkflowStep::Implement,
        WorkflowStep::Verify,
        WorkflowStep::Commit,
        WorkflowStep::PullRequest,
        WorkflowStep::UpdateDocs,
    ];

    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|step| step == self)
            .map_or(0, |index| index + 1)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WorkflowStep::GatherContext => "Gather context",
            WorkflowStep::Scope => "Scope with the user",
            WorkflowStep::Branch => "Create a branch",
            WorkflowStep::Implement => "Implement",
            WorkflowStep::Verify => "Verify",
            WorkflowStep::Commit => "Commit",
            WorkflowStep::PullRequest => "Push and open a pull request",
            WorkflowStep::UpdateDocs => "Update docs",
        }
    }

    pub fn instructions(&self) -> &'static [&'static str] {
        match self {
            WorkflowStep::GatherContext => &[
                "Read the ticket in the tracker.",
                "Read the code the ticket touches before proposing anything.",
            ],
            WorkflowStep::Scope => &[
                "Explain your approach and ask the user about open questions.",
                "Wait for their input before writing code.",
            ],
            WorkflowStep::Branch => &[
                "Check out the main branch and pull.",
                "Create a branch named {TICKET-ID}-{short-description} (`handoff start`).",
            ],
            WorkflowStep::Implement => &[
                "Make the change agreed in scoping, with tests alongside.",
            ],
            WorkflowStep::Verify => &[
                "Run the most relevant test file, then the full test suite, then the linter (`handoff verify`).",
                "Any failure blocks commit and push; fix it first.",
            ],
            WorkflowStep::Commit => &[
                "Write one line: feat|fix|docs|test|refactor|chore: imperative description (`handoff commit`).",
                "No ticket id and no co-author trailer in the message.",
            ],
            WorkflowStep::PullRequest => &[
                "Push the branch and open a PR whose title mirrors the commit (`handoff pr`).",
                "Reference the ticket id in the description and summarize the change.",
            ],
            WorkflowStep::UpdateDocs => &[
                "Run the documentation update for user-facing changes.",
                "Skip it for internal-only or test-only changes.",
            ],
        }
    }
}
