//! Command implementations for the gh-branch-protection CLI.
//!
//! Each submodule handles one sub-command:
//!
//! - `list_cmd`: protected branch and rule listing
//! - `get_cmd`: showing a single rule as JSON
//! - `set_cmd`: creating a rule from JSON settings on stdin
//! - `delete_cmd`: deleting a rule by ID or branch
//!
//! Commands only talk to GitHub through [`BranchProtectionClient`] and write their
//! output to the given writer, so they run the same against the real API and
//! against an in-memory client.

use std::io::{Read, Write};

use github_client::{BranchProtectionClient, RepositoryRef};

use crate::{cli::Commands, errors::Error};

pub mod delete_cmd;
pub mod get_cmd;
pub mod list_cmd;
pub mod set_cmd;

#[cfg(test)]
pub(crate) mod mock_client;

/// Everything a command needs to run.
pub struct CommandContext<'a> {
    pub client: &'a dyn BranchProtectionClient,
    /// The target repository, absent when a command addresses a rule by ID
    pub repository: Option<&'a RepositoryRef>,
    pub page_size: u32,
}

impl<'a> CommandContext<'a> {
    /// Returns the target repository.
    ///
    /// # Errors
    ///
    /// Returns `Error::Repository` if none was resolved.
    pub fn repository(&self) -> Result<&'a RepositoryRef, Error> {
        self.repository.ok_or_else(|| {
            Error::Repository(
                "no repository selected, use --repo or run inside a git repository".to_string(),
            )
        })
    }
}

/// Runs a parsed command.
///
/// `input` is only read by `set`. Results are written to `out`.
///
/// # Errors
///
/// Returns the error of the sub-command.
pub async fn execute(
    command: &Commands,
    ctx: &CommandContext<'_>,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<(), Error> {
    match command {
        Commands::List { rules } => {
            if *rules {
                list_cmd::execute_rules(ctx, out).await
            } else {
                list_cmd::execute(ctx, out).await
            }
        }
        Commands::Get { target } => get_cmd::execute(ctx, target, out).await,
        Commands::Set { pattern } => set_cmd::execute(ctx, pattern, input).await,
        Commands::Delete { target } => delete_cmd::execute(ctx, target).await,
    }
}
