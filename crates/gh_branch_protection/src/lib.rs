//! gh-branch-protection: a `gh` extension managing GitHub branch protection rules.
//!
//! The binary is a thin wrapper around [`run`], which resolves the repository,
//! configuration and access token and then dispatches the parsed command.

use std::io::{Read, Write};

use github_client::{GitHubClient, RepositoryRef};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod repository;

use crate::{
    cli::Cli,
    commands::CommandContext,
    config::AppConfig,
    errors::{Action, Error},
};

/// Runs one invocation of the CLI.
///
/// `input` is the rule settings source for `set`; command output goes to `out`.
///
/// # Errors
///
/// Returns `Error::Config` for an unreadable or invalid configuration file,
/// `Error::Repository` when the target repository cannot be determined, and
/// `Error::Auth` when no token is available. Failures of the command itself come
/// back as `Error::GitHub` tagged with the action, or as the input/output
/// variants for `set` and the printing commands.
#[instrument(skip_all, fields(command = ?cli.command))]
pub async fn run(cli: &Cli, input: &mut dyn Read, out: &mut dyn Write) -> Result<(), Error> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    let repository = resolve_repository(cli)?;

    let host = repository
        .as_ref()
        .map(|repo| repo.host.clone())
        .unwrap_or_else(repository::default_host);
    let endpoint = config.api.endpoint_for(&host)?;
    debug!(host = %host, url = %endpoint.graphql_url(), "Using GraphQL endpoint");

    let token = auth::resolve_token(&host)?;
    let client = GitHubClient::for_endpoint(&endpoint, token.expose_secret()).map_err(|e| {
        Error::GitHub {
            action: action_for(&cli.command),
            source: e,
        }
    })?;

    let ctx = CommandContext {
        client: &client,
        repository: repository.as_ref(),
        page_size: config.api.page_size,
    };

    commands::execute(&cli.command, &ctx, input, out).await
}

/// Returns the repository for the command, if it needs one.
fn resolve_repository(cli: &Cli) -> Result<Option<RepositoryRef>, Error> {
    if let Some(repo) = &cli.repo {
        return repository::parse_repo_arg(repo, &repository::default_host()).map(Some);
    }

    if !cli.command.needs_repository() {
        return Ok(None);
    }

    let current_dir = std::env::current_dir()
        .map_err(|e| Error::Repository(format!("cannot read the current directory: {e}")))?;
    repository::discover_repository(&current_dir).map(Some)
}

fn action_for(command: &cli::Commands) -> Action {
    match command {
        cli::Commands::List { rules: false } => Action::ListProtectedBranches,
        cli::Commands::List { rules: true } => Action::ListRules,
        cli::Commands::Get { .. } => Action::GetBranchProtection,
        cli::Commands::Set { .. } => Action::SetBranchProtection,
        cli::Commands::Delete { .. } => Action::DeleteBranchProtection,
    }
}
