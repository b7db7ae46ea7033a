use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::BranchingStrategy;

const CONFIG_DIR_ENV: &str = "HANDOFF_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = "handoff";
const CONFIG_FILE_NAME: &str = "config.toml";
/// Per-repository overrides, checked in next to the code.
pub const WORKSPACE_CONFIG_FILE: &str = ".handoff.toml";

const DEFAULT_MAIN_BRANCH: &str = "main";
const DEFAULT_TEST_COMMAND: &str = "cargo test";
const DEFAULT_TARGETED_TEST_COMMAND: &str = "cargo test --test {file}";
const DEFAULT_LINT_COMMAND: &str = "cargo clippy --all-targets -- -D warnings";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub workspace_root: PathBuf,
    pub main_branch: String,
    pub branching: BranchingStrategy,
    pub test_command: String,
    pub targeted_test_command: String,
    pub lint_command: String,
    pub docs_command: Option<String>,
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub github_api_url: String,
    /// `owner/name` of the repository pull requests are opened against.
    pub github_repository: Option<String>,
    pub github_token: Option<String>,
    pub llm_provider: LlmProvider,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Custom(String),
}

impl LlmProvider {
    fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "gemini" => LlmProvider::Gemini,
            other => LlmProvider::Custom(other.to_string()),
        }
    }
}

impl AppConfig {
    /// User config, then the workspace's `.handoff.toml`, then the environment.
    pub fn load(workspace_hint: &Path) -> AppResult<Self> {
        let user = StoredConfig::load()?;
        let workspace = StoredConfig::load_from(&workspace_hint.join(WORKSPACE_CONFIG_FILE))?;
        Ok(Self::resolve(
            user.layered(workspace),
            workspace_hint,
            |key| env::var(key).ok(),
        ))
    }

    pub fn resolve(
        stored: StoredConfig,
        workspace_root: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let main_branch = env("HANDOFF_MAIN_BRANCH")
            .or(stored.main_branch)
            .unwrap_or_else(|| DEFAULT_MAIN_BRANCH.to_string());
        let llm_provider = env("HANDOFF_LLM_PROVIDER")
            .or(stored.llm_provider)
            .map(|name| LlmProvider::from_name(&name))
            .unwrap_or(LlmProvider::Gemini);

        Self {
            workspace_root: workspace_root.to_path_buf(),
            main_branch,
            branching: BranchingStrategy::from_prefix(stored.branch_prefix.as_deref()),
            test_command: stored
                .test_command
                .unwrap_or_else(|| DEFAULT_TEST_COMMAND.to_string()),
            targeted_test_command: stored
                .targeted_test_command
                .unwrap_or_else(|| DEFAULT_TARGETED_TEST_COMMAND.to_string()),
            lint_command: stored
                .lint_command
                .unwrap_or_else(|| DEFAULT_LINT_COMMAND.to_string()),
            docs_command: stored.docs_command,
            jira_base_url: env("HANDOFF_JIRA_BASE_URL").or(stored.jira_base_url),
            jira_email: env("HANDOFF_JIRA_EMAIL").or(stored.jira_email),
            jira_token: env("HANDOFF_JIRA_TOKEN").or(stored.jira_token),
            github_api_url: stored
                .github_api_url
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_repository: env("HANDOFF_GITHUB_REPOSITORY").or(stored.github_repository),
            github_token: env("HANDOFF_GITHUB_TOKEN")
                .or_else(|| env("GITHUB_TOKEN"))
                .or(stored.github_token),
            llm_provider,
            gemini_api_key: env("GEMINI_API_KEY").or(stored.gemini_api_key),
            gemini_model: stored
                .gemini_model
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        }
    }
}

/// The on-disk shape of a config file. Every field is optional so user and
/// workspace files can each set a subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targeted_test_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lint_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jira_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jira_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jira_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Fields set in `over` win.
    pub fn layered(self, over: StoredConfig) -> StoredConfig {
        StoredConfig {
            main_branch: over.main_branch.or(self.main_branch),
            branch_prefix: over.branch_prefix.or(self.branch_prefix),
            test_command: over.test_command.or(self.test_command),
            targeted_test_command: over.targeted_test_command.or(self.targeted_test_command),
            lint_command: over.lint_command.or(self.lint_command),
            docs_command: over.docs_command.or(self.docs_command),
            jira_base_url: over.jira_base_url.or(self.jira_base_url),
            jira_email: over.jira_email.or(self.jira_email),
            jira_token: over.jira_token.or(self.jira_token),
            github_api_url: over.github_api_url.or(self.github_api_url),
            github_repository: over.github_repository.or(self.github_repository),
            github_token: over.github_token.or(self.github_token),
            llm_provider: over.llm_provider.or(self.llm_provider),
            gemini_api_key: over.gemini_api_key.or(self.gemini_api_key),
            gemini_model: over.gemini_model.or(self.gemini_model),
        }
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration(format!(
                "cannot locate a config directory; set {CONFIG_DIR_ENV}"
            ))
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::TempDir;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let config = AppConfig::resolve(StoredConfig::default(), Path::new("/repo"), no_env);
        assert_eq!(config.main_branch, "main");
        assert_eq!(config.test_command, DEFAULT_TEST_COMMAND);
        assert_eq!(config.lint_command, DEFAULT_LINT_COMMAND);
        assert_eq!(config.llm_provider, LlmProvider::Gemini);
        assert!(matches!(config.branching, BranchingStrategy::Raw));
        assert_eq!(config.workspace_root, PathBuf::from("/repo"));
    }

    #[test]
    fn environment_overrides_stored_values() {
        let stored = StoredConfig {
            jira_token: Some("from-file".to_string()),
            github_token: Some("file-gh".to_string()),
            main_branch: Some("trunk".to_string()),
            ..StoredConfig::default()
        };
        let vars = HashMap::from([
            ("HANDOFF_JIRA_TOKEN", "from-env"),
            ("GITHUB_TOKEN", "env-gh"),
            ("HANDOFF_MAIN_BRANCH", "  "),
            ("HANDOFF_LLM_PROVIDER", "Ollama"),
        ]);
        let config = AppConfig::resolve(stored, Path::new("."), |key| {
            vars.get(key).map(|value| value.to_string())
        });

        assert_eq!(config.jira_token.as_deref(), Some("from-env"));
        assert_eq!(config.github_token.as_deref(), Some("env-gh"));
        assert_eq!(config.main_branch, "trunk");
        assert_eq!(config.llm_provider, LlmProvider::Custom("ollama".to_string()));
    }

    #[test]
    fn workspace_layer_wins() {
        let user = StoredConfig {
            test_command: Some("cargo test".to_string()),
            lint_command: Some("cargo clippy".to_string()),
            ..StoredConfig::default()
        };
        let workspace = StoredConfig {
            test_command: Some("pytest".to_string()),
            ..StoredConfig::default()
        };
        let merged = user.layered(workspace);
        assert_eq!(merged.test_command.as_deref(), Some("pytest"));
        assert_eq!(merged.lint_command.as_deref(), Some("cargo clippy"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = StoredConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, StoredConfig::default());
    }

    #[test]
    fn saves_and_reloads_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let stored = StoredConfig {
            branch_prefix: Some("feature".to_string()),
            docs_command: Some("make docs".to_string()),
            ..StoredConfig::default()
        };
        stored.save_to(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("branch_prefix = \"feature\""));
        assert!(!text.contains("jira_token"));
        assert_eq!(StoredConfig::load_from(&path).unwrap(), stored);
    }

    #[test]
    fn rejects_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "main_branch = [").unwrap();
        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }
}
