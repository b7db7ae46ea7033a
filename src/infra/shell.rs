use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::domain::verification::{CheckCommand, CheckOutcome, CheckStatus};
use crate::error::{AppError, AppResult};
use crate::services::CheckRunner;

const OUTPUT_TAIL_LINES: usize = 40;

/// Runs checks as child processes in the workspace root.
pub struct ProcessCheckRunner {
    workspace_root: PathBuf,
}

impl ProcessCheckRunner {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }
}

#[async_trait]
impl CheckRunner for ProcessCheckRunner {
    async fn run(&self, command: &CheckCommand) -> AppResult<CheckOutcome> {
        let command_line = command.command_line();
        info!(check = %command.kind, command = %command_line, "running check");

        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| AppError::Verification {
                step: command.kind.label().to_string(),
                detail: format!("could not start '{command_line}': {err}"),
            })?;

        let status = if output.status.success() {
            CheckStatus::Passed
        } else {
            CheckStatus::Failed {
                exit_code: output.status.code(),
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CheckOutcome {
            kind: command.kind,
            command: command_line,
            status,
            output_tail: tail(&combined, OUTPUT_TAIL_LINES),
        })
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim_end().lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
