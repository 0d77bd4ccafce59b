//! The `get` command.

use std::io::Write;

use github_client::{protection, RuleTarget};
use tracing::instrument;

use crate::errors::{Action, Error};

use super::CommandContext;

#[cfg(test)]
#[path = "get_cmd_tests.rs"]
mod tests;

/// Prints the rule addressed by `target` (a rule ID or a branch name) as indented
/// JSON.
#[instrument(skip(ctx, out))]
pub async fn execute(
    ctx: &CommandContext<'_>,
    target: &str,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let target = RuleTarget::parse(target);
    let repo = if target.is_id() {
        ctx.repository
    } else {
        Some(ctx.repository()?)
    };

    let rule = protection::find_rule(ctx.client, repo, &target)
        .await
        .map_err(Error::github(Action::GetBranchProtection))?;

    let json = serde_json::to_string_pretty(&rule).map_err(|e| Error::Output(e.into()))?;
    writeln!(out, "{json}").map_err(Error::Output)
}
