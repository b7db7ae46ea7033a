use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::branch::BranchName;
use crate::domain::change::ChangeSummary;
use crate::domain::commit::CommitMessage;
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

/// Diff text handed to the language model is capped at this many bytes.
const MAX_DIFF_BYTES: usize = 20_000;

pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    /// The top level of the work tree containing `dir`, if any.
    pub async fn toplevel(dir: &Path) -> Option<PathBuf> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir)
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!root.is_empty()).then(|| PathBuf::from(root))
    }

    async fn git(&self, args: &[&str]) -> AppResult<String> {
        debug!(args = ?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn untracked_files(&self) -> AppResult<Vec<String>> {
        let listing = self
            .git(&["ls-files", "--others", "--exclude-standard", "-z"])
            .await?;
        Ok(listing
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// `git diff` leaves untracked files out, so render them as additions.
    async fn new_file_diff(&self, path: &str) -> String {
        let mut block =
            format!("diff --git a/{path} b/{path}\nnew file\n--- /dev/null\n+++ b/{path}\n");
        match fs::read(self.workspace_root.join(path)).await {
            Ok(bytes) if bytes.len() > MAX_DIFF_BYTES => block.push_str("[large file omitted]\n"),
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => {
                    for line in text.lines() {
                        block.push('+');
                        block.push_str(line);
                        block.push('\n');
                    }
                }
                Err(_) => block.push_str("Binary file\n"),
            },
            Err(err) => {
                debug!(path, error = %err, "cannot read untracked file");
                block.push_str("[unreadable]\n");
            }
        }
        block
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn summarize_changes(&self) -> AppResult<ChangeSummary> {
        let status = self.git(&["status", "--porcelain"]).await?;
        let files_changed = status.lines().filter(|line| !line.trim().is_empty()).count();
        if files_changed == 0 {
            return Ok(ChangeSummary::empty());
        }

        let mut summary = self.git(&["diff", "HEAD", "--stat"]).await?;
        let mut diff = self.git(&["diff", "HEAD"]).await?;
        for path in self.untracked_files().await? {
            summary.push_str(&format!("\n {path} | new file"));
            diff.push_str(&self.new_file_diff(&path).await);
        }
        if diff.len() > MAX_DIFF_BYTES {
            let mut cut = MAX_DIFF_BYTES;
            while !diff.is_char_boundary(cut) {
                cut -= 1;
            }
            diff.truncate(cut);
            diff.push_str("\n[diff truncated]\n");
        }

        Ok(ChangeSummary {
            files_changed,
            summary: summary.trim().to_string(),
            diff,
        })
    }

    async fn sync_main(&self, main: &str) -> AppResult<()> {
        self.git(&["checkout", main]).await?;
        self.git(&["pull", "--ff-only"]).await?;
        info!(branch = main, "main branch up to date");
        Ok(())
    }

    async fn create_branch(&self, branch: &BranchName) -> AppResult<()> {
        self.git(&["checkout", "-b", branch.as_str()]).await?;
        Ok(())
    }

    async fn current_branch(&self) -> AppResult<String> {
        let name = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        Ok(name.trim().to_string())
    }

    async fn last_commit_subject(&self) -> AppResult<String> {
        let subject = self.git(&["log", "-1", "--format=%s"]).await?;
        Ok(subject.trim().to_string())
    }

    async fn stage_all(&self) -> AppResult<()> {
        self.git(&["add", "-A"]).await?;
        Ok(())
    }

    async fn commit(&self, message: &CommitMessage) -> AppResult<()> {
        let message = message.to_string();
        self.git(&["commit", "-m", &message]).await?;
        Ok(())
    }

    async fn push(&self, branch: &BranchName) -> AppResult<()> {
        self.git(&["push", "-u", "origin", branch.as_str()]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::process::Command as StdCommand;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::commit::CommitType;
    use crate::domain::ticket::TicketId;

    fn git_available() -> bool {
        StdCommand::new("git").arg("--version").output().is_ok()
    }

    fn run(dir: &Path, args: &[&str]) {
        let status = StdCommand::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    fn init_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        run(dir.path(), &["init", "-q"]);
        run(dir.path(), &["checkout", "-q", "-b", "main"]);
        run(dir.path(), &["config", "user.email", "dev@example.com"]);
        run(dir.path(), &["config", "user.name", "Dev"]);
        run(dir.path(), &["config", "commit.gpgsign", "false"]);
        fs::write(dir.path().join("README.md"), "hello\n").unwrap();
        run(dir.path(), &["add", "-A"]);
        run(dir.path(), &["commit", "-q", "-m", "chore: initial commit"]);
        dir
    }

    #[tokio::test]
    async fn branches_and_commits_in_a_real_repository() {
        if !git_available() {
            return;
        }
        let repo = init_repo();
        let git = GitCli::new(repo.path().to_path_buf());

        assert!(git.summarize_changes().await.unwrap().is_empty());

        let ticket = TicketId::parse("HG-1").unwrap();
        let branch = BranchName::from_parts(&ticket, "add greeting");
        git.create_branch(&branch).await.unwrap();
        assert_eq!(git.current_branch().await.unwrap(), "HG-1-add-greeting");

        fs::write(repo.path().join("README.md"), "hello\nworld\n").unwrap();
        let changes = git.summarize_changes().await.unwrap();
        assert_eq!(changes.files_changed, 1);
        assert!(changes.summary.contains("README.md"));
        assert!(changes.diff.contains("+world"));

        git.stage_all().await.unwrap();
        git.commit(&CommitMessage::new(CommitType::Docs, "add greeting"))
            .await
            .unwrap();
        assert_eq!(
            git.last_commit_subject().await.unwrap(),
            "docs: add greeting"
        );

        fs::write(repo.path().join("new.rs"), "fn main() {}\n").unwrap();
        let changes = git.summarize_changes().await.unwrap();
        assert_eq!(changes.files_changed, 1);
        assert!(changes.summary.contains("new.rs | new file"));
        assert!(changes.diff.contains("+++ b/new.rs"));
        assert!(changes.diff.contains("+fn main() {}"));
    }

    #[tokio::test]
    async fn finds_toplevel_from_subdirectory() {
        if !git_available() {
            return;
        }
        let repo = init_repo();
        let nested = repo.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let root = GitCli::toplevel(&nested).await.unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            repo.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn reports_git_failures() {
        if !git_available() {
            return;
        }
        let repo = init_repo();
        let git = GitCli::new(repo.path().to_path_buf());
        let err = git.sync_main("does-not-exist").await.unwrap_err();
        assert!(matches!(err, AppError::VersionControl(_)));
    }
}
