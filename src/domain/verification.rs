use std::fmt;

use crate::error::{AppError, AppResult};

const FILE_PLACEHOLDER: &str = "{file}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    TargetedTests,
    FullSuite,
    Lint,
    Docs,
}

impl CheckKind {
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::TargetedTests => "targeted tests",
            CheckKind::FullSuite => "full test suite",
            CheckKind::Lint => "lint",
            CheckKind::Docs => "docs update",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An external command, already split into program and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCommand {
    pub kind: CheckKind,
    pub program: String,
    pub args: Vec<String>,
}

impl CheckCommand {
    pub fn parse(kind: CheckKind, command_line: &str) -> AppResult<Self> {
        let words = shlex::split(command_line).ok_or_else(|| {
            AppError::Configuration(format!("{kind} command has unbalanced quotes: {command_line}"))
        })?;
        let mut words = words.into_iter();
        let program = words
            .next()
            .ok_or_else(|| AppError::Configuration(format!("{kind} command is empty")))?;
        Ok(Self {
            kind,
            program,
            args: words.collect(),
        })
    }

    /// Fills `{file}` in a targeted-test template, or appends the file when absent.
    pub fn targeted(template: &str, file: &str) -> AppResult<Self> {
        let mut command = Self::parse(CheckKind::TargetedTests, template)?;
        if command.args.iter().any(|arg| arg.contains(FILE_PLACEHOLDER)) {
            for arg in &mut command.args {
                *arg = arg.replace(FILE_PLACEHOLDER, file);
            }
        } else {
            command.args.push(file.to_string());
        }
        Ok(command)
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Checks in the order they must pass: targeted tests, full suite, lint.
#[derive(Debug, Clone)]
pub struct VerificationPlan {
    pub checks: Vec<CheckCommand>,
}

impl VerificationPlan {
    pub fn new(
        targeted: Option<(&str, &str)>,
        test_command: &str,
        lint_command: &str,
    ) -> AppResult<Self> {
        let mut checks = Vec::with_capacity(3);
        if let Some((template, file)) = targeted {
            checks.push(CheckCommand::targeted(template, file)?);
        }
        checks.push(CheckCommand::parse(CheckKind::FullSuite, test_command)?);
        checks.push(CheckCommand::parse(CheckKind::Lint, lint_command)?);
        Ok(Self { checks })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed { exit_code: Option<i32> },
}

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub command: String,
    pub status: CheckStatus,
    /// Last lines of combined stdout and stderr.
    pub output_tail: String,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub outcomes: Vec<CheckOutcome>,
    /// Checks never started because an earlier one failed.
    pub not_run: Vec<CheckKind>,
}

impl VerificationReport {
    pub fn is_green(&self) -> bool {
        self.not_run.is_empty() && self.outcomes.iter().all(CheckOutcome::passed)
    }

    pub fn first_failure(&self) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| !outcome.passed())
    }
}
