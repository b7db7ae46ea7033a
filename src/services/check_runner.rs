use async_trait::async_trait;

use crate::domain::verification::{CheckCommand, CheckOutcome};
use crate::error::AppResult;

/// Runs an external check. A check that runs and fails is an `Ok` outcome;
/// `Err` means it could not be started.
#[async_trait]
pub trait CheckRunner: Send + Sync {
    async fn run(&self, command: &CheckCommand) -> AppResult<CheckOutcome>;
}
