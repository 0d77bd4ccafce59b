//! Command-line surface.

use clap::{Parser, Subcommand};
use github_client::RuleTarget;

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

/// gh-branch-protection: manage GitHub branch protection rules
#[derive(Debug, Parser)]
#[command(name = "gh-branch-protection", version)]
#[command(about = "List, get, set and delete branch protection rules", long_about = None)]
pub struct Cli {
    /// Select another repository using the [HOST/]OWNER/REPO format
    #[arg(short = 'R', long = "repo", env = "GH_REPO", global = true)]
    pub repo: Option<String>,

    /// Path to the configuration file
    #[arg(long, env = "GH_BRANCH_PROTECTION_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the protected branches of the repository
    List {
        /// List the protection rules (ID and pattern) instead of branch names
        #[arg(long)]
        rules: bool,
    },

    /// Show a branch protection rule as JSON
    Get {
        /// Rule ID or branch name
        target: String,
    },

    /// Create a branch protection rule from JSON settings read on stdin
    Set {
        /// Branch name pattern the rule applies to
        pattern: String,
    },

    /// Delete a branch protection rule
    Delete {
        /// Rule ID or branch name
        target: String,
    },
}

impl Commands {
    /// Returns true when the command has to know the target repository.
    ///
    /// Commands addressing a rule by ID work without one.
    pub fn needs_repository(&self) -> bool {
        match self {
            Commands::List { .. } | Commands::Set { .. } => true,
            Commands::Get { target } | Commands::Delete { target } => {
                !RuleTarget::parse(target).is_id()
            }
        }
    }
}
