use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use handoff::cmd::check::CheckArgs;
use handoff::cmd::commit::CommitArgs;
use handoff::cmd::config::ConfigArgs;
use handoff::cmd::draft::DraftArgs;
use handoff::cmd::parse::ParseArgs;
use handoff::cmd::pr::PrArgs;
use handoff::cmd::start::StartArgs;
use handoff::cmd::verify::VerifyArgs;
use handoff::cmd;
use handoff::config::{AppConfig, LlmProvider};
use handoff::context::AppContext;
use handoff::error::AppResult;
use handoff::infra::git::GitCli;
use handoff::infra::github::GitHubClient;
use handoff::infra::jira::JiraClient;
use handoff::infra::llm::GeminiClient;
use handoff::infra::shell::ProcessCheckRunner;
use handoff::logging;
use handoff::services::LanguageModelService;

#[derive(Parser)]
#[command(
    name = "handoff",
    author,
    version,
    about = "Take a ticket from tracker to pull request, one checked step at a time"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the workflow steps.
    Guide,
    /// Fetch a ticket, refresh the main branch and create the ticket branch.
    Start(StartArgs),
    /// Run targeted tests, the full suite and the linter.
    Verify(VerifyArgs),
    /// Check a commit message or branch name against the conventions.
    Check(CheckArgs),
    /// Verify, then stage everything and commit.
    Commit(CommitArgs),
    /// Verify, push the branch and open a pull request.
    Pr(PrArgs),
    /// Draft a commit message and summaries for the current changes.
    Draft(DraftArgs),
    /// Parse JSON out of language-model output.
    ParseJson(ParseArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Guide => {
            cmd::guide::run();
            Ok(())
        }
        Commands::Check(args) => cmd::check::run(args.command),
        Commands::ParseJson(args) => cmd::parse::run(args),
        Commands::Config(args) => cmd::config::run(args.command),
        Commands::Start(args) => cmd::start::run(&build_context().await?, args).await,
        Commands::Verify(args) => cmd::verify::run(&build_context().await?, args).await,
        Commands::Commit(args) => cmd::commit::run(&build_context().await?, args).await,
        Commands::Pr(args) => cmd::pr::run(&build_context().await?, args).await,
        Commands::Draft(args) => cmd::draft::run(&build_context().await?, args).await,
    }
}

async fn build_context() -> AppResult<AppContext> {
    let cwd = std::env::current_dir()?;
    let workspace_root = match GitCli::toplevel(&cwd).await {
        Some(root) => root,
        None => {
            warn!(dir = %cwd.display(), "not inside a git work tree; using the current directory");
            cwd
        }
    };
    let config = AppConfig::load(&workspace_root)?;

    if config.jira_base_url.is_none() || config.jira_token.is_none() {
        warn!("Jira is not fully configured; ticket lookups will fail without --summary");
    }
    if config.github_repository.is_none() || config.github_token.is_none() {
        warn!("GitHub repository or token not configured; pull requests cannot be opened");
    }
    if config.gemini_api_key.is_none() {
        warn!("Gemini API key not configured; `handoff draft` will fail");
    }

    let language_model: Arc<dyn LanguageModelService> = match &config.llm_provider {
        LlmProvider::Gemini => Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )),
        LlmProvider::Custom(provider) => {
            warn!(%provider, "custom LLM provider not supported, using Gemini");
            Arc::new(GeminiClient::new(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
            ))
        }
    };

    let git = Arc::new(GitCli::new(config.workspace_root.clone()));
    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_base_url.clone(),
        config.jira_email.clone(),
        config.jira_token.clone(),
    ));
    let code_host = Arc::new(GitHubClient::new(
        config.github_api_url.clone(),
        config.github_repository.clone(),
        config.github_token.clone(),
    ));
    let checks = Arc::new(ProcessCheckRunner::new(config.workspace_root.clone()));

    Ok(AppContext::new(
        config,
        git,
        issue_tracker,
        code_host,
        language_model,
        checks,
    ))
}
