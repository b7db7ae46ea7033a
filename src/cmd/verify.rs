use clap::Args;

use crate::context::AppContext;
use crate::domain::verification::VerificationReport;
use crate::error::AppResult;
use crate::workflow::verify::{ensure_green, run_verification};

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Test file to run before the full suite.
    #[arg(long = "test-file")]
    pub test_file: Option<String>,
}

pub async fn run(ctx: &AppContext, args: VerifyArgs) -> AppResult<()> {
    let report = run_verification(ctx, args.test_file.as_deref()).await?;
    print_report(&report);
    ensure_green(&report)
}

pub fn print_report(report: &VerificationReport) {
    for outcome in &report.outcomes {
        let mark = if outcome.passed() { "ok" } else { "FAILED" };
        println!("[{mark}] {}: {}", outcome.kind, outcome.command);
    }
    for kind in &report.not_run {
        println!("[skipped] {kind}");
    }
}
