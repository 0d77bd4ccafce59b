//! The `set` command.
//!
//! Reads a JSON object of rule settings from stdin and creates a rule for the given
//! pattern. The object uses the same field names `get` prints, so the output of
//! `get` can be piped into `set`:
//!
//! ```bash
//! gh branch-protection get main | gh branch-protection set 'release/*'
//! ```

use std::io::Read;

use github_client::{protection, RuleSettings};
use tracing::{info, instrument};

use crate::errors::{Action, Error};

use super::CommandContext;

#[cfg(test)]
#[path = "set_cmd_tests.rs"]
mod tests;

/// Creates a rule for `pattern` from the settings read on `input`.
///
/// The input is decoded before anything is sent to GitHub. Fields that are not rule
/// settings (`id`, `pattern`) are ignored, and absent settings are sent as
/// false, zero or empty.
///
/// # Errors
///
/// Returns `Error::ReadInput` or `Error::ParseInput` before any request when the
/// input is unreadable or not a settings object, and `Error::Repository` when no
/// repository is known.
#[instrument(skip(ctx, input))]
pub async fn execute(
    ctx: &CommandContext<'_>,
    pattern: &str,
    input: &mut dyn Read,
) -> Result<(), Error> {
    let settings = read_settings(input)?;
    let repo = ctx.repository()?;

    let rule = protection::create_rule_for_pattern(ctx.client, repo, pattern, settings)
        .await
        .map_err(Error::github(Action::SetBranchProtection))?;

    info!(rule_id = %rule.id, "Branch protection configured");
    Ok(())
}

fn read_settings(input: &mut dyn Read) -> Result<RuleSettings, Error> {
    let mut content = String::new();
    input
        .read_to_string(&mut content)
        .map_err(Error::ReadInput)?;

    serde_json::from_str(&content).map_err(Error::ParseInput)
}
