use tracing::{info, warn};

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::verification::{CheckStatus, VerificationPlan, VerificationReport};
use crate::error::{AppError, AppResult};

pub fn plan(config: &AppConfig, targeted_file: Option<&str>) -> AppResult<VerificationPlan> {
    VerificationPlan::new(
        targeted_file.map(|file| (config.targeted_test_command.as_str(), file)),
        &config.test_command,
        &config.lint_command,
    )
}

/// Runs the checks in order and stops at the first failure.
pub async fn run_verification(
    ctx: &AppContext,
    targeted_file: Option<&str>,
) -> AppResult<VerificationReport> {
    let plan = plan(&ctx.config, targeted_file)?;
    let mut report = VerificationReport::default();

    let mut checks = plan.checks.into_iter();
    for check in checks.by_ref() {
        let outcome = ctx.checks.run(&check).await?;
        let passed = outcome.passed();
        report.outcomes.push(outcome);
        if !passed {
            warn!(check = %check.kind, "check failed; remaining checks skipped");
            break;
        }
    }
    report.not_run = checks.map(|check| check.kind).collect();

    if report.is_green() {
        info!(checks = report.outcomes.len(), "verification passed");
    }
    Ok(report)
}

pub fn ensure_green(report: &VerificationReport) -> AppResult<()> {
    let Some(failure) = report.first_failure() else {
        return Ok(());
    };
    let exit = match &failure.status {
        CheckStatus::Failed {
            exit_code: Some(code),
        } => format!("exit code {code}"),
        _ => "a signal".to_string(),
    };
    let mut detail = format!("`{}` ended with {exit}", failure.command);
    if !failure.output_tail.is_empty() {
        detail.push('\n');
        detail.push_str(&failure.output_tail);
    }
    Err(AppError::Verification {
        step: failure.kind.label().to_string(),
        detail,
    })
}
