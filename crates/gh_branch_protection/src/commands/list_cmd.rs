//! The `list` command.

use std::io::Write;

use github_client::protection;
use tracing::instrument;

use crate::errors::{Action, Error};

use super::CommandContext;

#[cfg(test)]
#[path = "list_cmd_tests.rs"]
mod tests;

/// Prints the name of every protected branch, one per line.
#[instrument(skip_all)]
pub async fn execute(ctx: &CommandContext<'_>, out: &mut dyn Write) -> Result<(), Error> {
    let repo = ctx.repository()?;
    let branches = protection::list_protected_branches(ctx.client, repo, ctx.page_size)
        .await
        .map_err(Error::github(Action::ListProtectedBranches))?;

    for branch in branches {
        writeln!(out, "{}", branch.name).map_err(Error::Output)?;
    }

    Ok(())
}

/// Prints every rule as `<id>\t<pattern>`, one per line.
#[instrument(skip_all)]
pub async fn execute_rules(ctx: &CommandContext<'_>, out: &mut dyn Write) -> Result<(), Error> {
    let repo = ctx.repository()?;
    let rules = protection::list_rules(ctx.client, repo, ctx.page_size)
        .await
        .map_err(Error::github(Action::ListRules))?;

    for rule in rules {
        writeln!(out, "{}\t{}", rule.id, rule.pattern).map_err(Error::Output)?;
    }

    Ok(())
}
