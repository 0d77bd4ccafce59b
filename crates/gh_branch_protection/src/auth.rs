//! Access token resolution.
//!
//! Tokens are looked up the same way the GitHub CLI does: environment variables
//! first, then the credentials `gh` stored in the system keyring, and finally by
//! asking `gh` itself.

use std::process::Command;

use github_client::DEFAULT_HOST;
use keyring::Entry;
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

/// Keyring service prefix used by the GitHub CLI.
pub const KEY_RING_SERVICE_PREFIX: &str = "gh:";

const DOTCOM_TOKEN_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];
const ENTERPRISE_TOKEN_VARS: [&str; 2] = ["GH_ENTERPRISE_TOKEN", "GITHUB_ENTERPRISE_TOKEN"];

/// Resolves the access token for `host`.
///
/// # Errors
///
/// Returns `Error::Auth` if no source yields a token.
#[instrument]
pub fn resolve_token(host: &str) -> Result<SecretString, Error> {
    if let Some(token) = token_from_env(host, |name| std::env::var(name).ok()) {
        debug!("Using token from the environment");
        return Ok(token);
    }

    if let Some(token) = token_from_keyring(host) {
        debug!("Using token from the keyring");
        return Ok(token);
    }

    if let Some(token) = token_from_gh(host) {
        debug!("Using token from gh");
        return Ok(token);
    }

    Err(Error::Auth(format!(
        "No access token found for {host}. Set GH_TOKEN or run `gh auth login --hostname {host}`"
    )))
}

/// Returns the token held in the environment variables for `host`.
///
/// github.com reads `GH_TOKEN` then `GITHUB_TOKEN`; any other host reads
/// `GH_ENTERPRISE_TOKEN` then `GITHUB_ENTERPRISE_TOKEN`. Empty values are skipped.
pub fn token_from_env<F>(host: &str, lookup: F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    let names = if is_dotcom(host) {
        DOTCOM_TOKEN_VARS
    } else {
        ENTERPRISE_TOKEN_VARS
    };

    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Returns the keyring service name the GitHub CLI uses for `host`.
pub fn keyring_service(host: &str) -> String {
    format!("{KEY_RING_SERVICE_PREFIX}{}", host.to_ascii_lowercase())
}

fn token_from_keyring(host: &str) -> Option<SecretString> {
    let entry = match Entry::new(&keyring_service(host), "") {
        Ok(entry) => entry,
        Err(e) => {
            debug!(error = %e, "Failed to open the keyring entry");
            return None;
        }
    };

    match entry.get_password() {
        Ok(token) if !token.trim().is_empty() => Some(SecretString::from(token.trim().to_string())),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "No token in the keyring");
            None
        }
    }
}

fn token_from_gh(host: &str) -> Option<SecretString> {
    let output = match Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            debug!(error = %e, "Failed to run gh");
            return None;
        }
    };

    if !output.status.success() {
        debug!(status = %output.status, "gh auth token failed");
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(SecretString::from(token))
    }
}

fn is_dotcom(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == DEFAULT_HOST || host.ends_with(".github.com")
}
