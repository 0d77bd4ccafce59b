//! Resolution of the repository a command targets.
//!
//! The repository comes from `--repo [HOST/]OWNER/REPO` when given, otherwise from
//! the remotes of the git repository containing the working directory.

use std::{path::Path, sync::OnceLock};

use git2::Repository;
use github_client::{RepositoryRef, DEFAULT_HOST};
use regex::Regex;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::Error;

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Remotes that are tried before any other, in order.
const PREFERRED_REMOTES: [&str; 3] = ["upstream", "github", "origin"];

/// Returns the host used when none is given: `GH_HOST`, or github.com.
pub fn default_host() -> String {
    std::env::var("GH_HOST")
        .ok()
        .map(|host| host.trim().to_ascii_lowercase())
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}

/// Parses a `[HOST/]OWNER/REPO` argument or a repository URL.
///
/// # Errors
///
/// Returns `Error::Repository` if the value has the wrong shape.
pub fn parse_repo_arg(value: &str, default_host: &str) -> Result<RepositoryRef, Error> {
    let value = value.trim();
    if value.contains("://") || scp_like_pattern().is_match(value) {
        return parse_remote_url(value);
    }

    let parts: Vec<&str> = value.split('/').collect();
    let (host, owner, name) = match parts.as_slice() {
        [owner, name] => (default_host, *owner, *name),
        [host, owner, name] => (*host, *owner, *name),
        _ => {
            return Err(Error::Repository(format!(
                "expected the \"[HOST/]OWNER/REPO\" format, got \"{value}\""
            )))
        }
    };

    build_ref(host, owner, name).ok_or_else(|| {
        Error::Repository(format!(
            "expected the \"[HOST/]OWNER/REPO\" format, got \"{value}\""
        ))
    })
}

/// Parses a git remote URL into a repository reference.
///
/// Handles `https://`, `http://`, `ssh://`, `git://` and scp-style
/// `user@host:owner/repo` URLs, with or without a `.git` suffix.
///
/// # Errors
///
/// Returns `Error::Repository` if the URL does not point at an `owner/repo` path.
pub fn parse_remote_url(remote_url: &str) -> Result<RepositoryRef, Error> {
    let invalid = || Error::Repository(format!("unsupported remote URL \"{remote_url}\""));

    if !remote_url.contains("://") {
        let captures = scp_like_pattern().captures(remote_url).ok_or_else(invalid)?;
        return repository_from_path(&captures["host"], &captures["path"]).ok_or_else(invalid);
    }

    let url = Url::parse(remote_url).map_err(|_| invalid())?;
    match url.scheme() {
        "https" | "http" | "ssh" | "git" | "git+ssh" | "ssh+git" => {}
        _ => return Err(invalid()),
    }

    let host = url.host_str().ok_or_else(invalid)?;
    repository_from_path(host, url.path()).ok_or_else(invalid)
}

/// Finds the repository targeted by the git checkout containing `start`.
///
/// Remotes named `upstream`, `github` and `origin` are tried first, in that order,
/// then the remaining remotes alphabetically. The first remote with a parseable URL
/// wins.
///
/// # Errors
///
/// Returns `Error::Repository` if `start` is not inside a git repository or no
/// remote has a usable URL.
#[instrument]
pub fn discover_repository(start: &Path) -> Result<RepositoryRef, Error> {
    let repo = Repository::discover(start)
        .map_err(|e| Error::Repository(format!("not a git repository: {}", e.message())))?;

    let remotes = repo
        .remotes()
        .map_err(|e| Error::Repository(format!("failed to read git remotes: {}", e.message())))?;

    let mut names: Vec<String> = remotes.iter().flatten().map(str::to_string).collect();
    names.sort_by_key(|name| remote_rank(name));

    if names.is_empty() {
        return Err(Error::Repository("no git remotes found".to_string()));
    }

    for name in &names {
        let Ok(remote) = repo.find_remote(name) else {
            continue;
        };
        let Some(remote_url) = remote.url() else {
            continue;
        };

        match parse_remote_url(remote_url) {
            Ok(repository) => {
                debug!(remote = %name, repository = %repository, "Resolved repository from remote");
                return Ok(repository);
            }
            Err(e) => debug!(remote = %name, error = %e, "Skipping remote"),
        }
    }

    Err(Error::Repository(
        "none of the git remotes point to a GitHub repository".to_string(),
    ))
}

fn remote_rank(name: &str) -> (usize, String) {
    let rank = PREFERRED_REMOTES
        .iter()
        .position(|preferred| *preferred == name)
        .unwrap_or(PREFERRED_REMOTES.len());
    (rank, name.to_string())
}

fn scp_like_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[^@/\s]+@)?(?P<host>[^:/\s]+):(?P<path>[^\s]+)$")
            .unwrap_or_else(|e| panic!("invalid remote URL pattern: {e}"))
    })
}

fn repository_from_path(host: &str, path: &str) -> Option<RepositoryRef> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, name) = path.split_once('/')?;
    if name.contains('/') {
        return None;
    }

    build_ref(host, owner, name)
}

fn build_ref(host: &str, owner: &str, name: &str) -> Option<RepositoryRef> {
    if host.is_empty() || owner.is_empty() || name.is_empty() {
        return None;
    }

    Some(RepositoryRef::new(normalize_host(host), owner, name))
}

fn normalize_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    match host.as_str() {
        "ssh.github.com" | "www.github.com" => DEFAULT_HOST.to_string(),
        _ => host,
    }
}
