//! The `delete` command.

use github_client::{protection, RuleTarget};
use tracing::{info, instrument};

use crate::errors::{Action, Error};

use super::CommandContext;

#[cfg(test)]
#[path = "delete_cmd_tests.rs"]
mod tests;

/// Deletes the rule addressed by `target` (a rule ID or a branch name).
///
/// Deleting is immediate: there is no confirmation prompt.
///
/// # Errors
///
/// Returns `Error::GitHub` wrapping `NoRuleToDelete` when the target has no rule;
/// no mutation is sent in that case.
#[instrument(skip(ctx))]
pub async fn execute(ctx: &CommandContext<'_>, target: &str) -> Result<(), Error> {
    let target = RuleTarget::parse(target);
    let repo = if target.is_id() {
        ctx.repository
    } else {
        Some(ctx.repository()?)
    };

    let rule_id = protection::delete_rule_for_target(ctx.client, repo, &target)
        .await
        .map_err(Error::github(Action::DeleteBranchProtection))?;

    info!(rule_id = %rule_id, "Branch protection deleted");
    Ok(())
}
