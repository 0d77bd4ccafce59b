use std::{fmt, io};

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// The user-facing action a command was performing when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ListProtectedBranches,
    ListRules,
    GetBranchProtection,
    SetBranchProtection,
    DeleteBranchProtection,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Action::ListProtectedBranches => "list protected branches",
            Action::ListRules => "list branch protection rules",
            Action::GetBranchProtection => "get the branch protection",
            Action::SetBranchProtection => "set branch protection configuration",
            Action::DeleteBranchProtection => "delete the branch protection",
        };
        f.write_str(text)
    }
}

/// Errors that can occur in the gh-branch-protection CLI.
///
/// Every variant renders as a single line suitable for printing to stderr before
/// exiting with a non-zero status.
#[derive(Error, Debug)]
pub enum Error {
    /// No access token could be found for the target host.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The configuration file could not be read or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The target repository could not be determined.
    ///
    /// Returned when `--repo` is malformed, or when no `--repo` is given and the
    /// working directory is not inside a git repository with a usable remote.
    #[error("Could not determine the repository: {0}")]
    Repository(String),

    /// Standard input could not be read.
    #[error("Failed to read the rule settings from standard input.")]
    ReadInput(#[source] io::Error),

    /// Standard input is not a valid rule settings object.
    #[error("Failed to parse the rule settings: {0}")]
    ParseInput(#[source] serde_json::Error),

    /// Writing the command output failed.
    #[error("Failed to write the output.")]
    Output(#[source] io::Error),

    /// A GitHub API operation failed.
    #[error("Cannot {action}: {source}")]
    GitHub {
        action: Action,
        #[source]
        source: github_client::Error,
    },
}

impl Error {
    /// Wraps a client error with the action that was being performed.
    pub fn github(action: Action) -> impl FnOnce(github_client::Error) -> Self {
        move |source| Error::GitHub { action, source }
    }
}
