//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when talking to the GitHub
//! GraphQL API through the github_client crate. Every variant that originates from
//! a remote call carries the [`Operation`] that produced it, so callers can match on
//! the failure programmatically instead of parsing message prefixes.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// The GraphQL operations issued by this crate.
///
/// The string form doubles as the GraphQL `operationName` sent with each request
/// and as the prefix of error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Walk the branch refs of a repository, keeping those with a rule attached.
    ListProtectedBranches,
    /// Walk the branch protection rules connection of a repository.
    ListBranchProtectionRules,
    /// Fetch a rule through the generic `node` endpoint.
    GetBranchProtectionRule,
    /// Fetch the rule attached to a branch ref.
    GetBranchProtectionRuleForBranch,
    /// Resolve the node ID of a repository.
    GetRepositoryId,
    /// Create a new rule.
    CreateBranchProtectionRule,
    /// Delete a rule by node ID.
    DeleteBranchProtectionRule,
}

impl Operation {
    /// Returns the GraphQL operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListProtectedBranches => "ListProtectedBranches",
            Operation::ListBranchProtectionRules => "ListBranchProtectionRules",
            Operation::GetBranchProtectionRule => "GetBranchProtectionRule",
            Operation::GetBranchProtectionRuleForBranch => "GetBranchProtectionRuleForBranch",
            Operation::GetRepositoryId => "GetRepositoryId",
            Operation::CreateBranchProtectionRule => "CreateBranchProtectionRule",
            Operation::DeleteBranchProtectionRule => "DeleteBranchProtectionRule",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the `errors` array of a GraphQL response.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct GraphQlError {
    /// Human readable description of the failure.
    pub message: String,

    /// GitHub's machine readable error type, e.g. `NOT_FOUND` or `FORBIDDEN`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl GraphQlError {
    /// Returns true when GitHub flagged the error as a missing object.
    pub fn is_not_found(&self) -> bool {
        self.error_type.as_deref() == Some("NOT_FOUND")
    }
}

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match delete_rule_for_target(&client, Some(&repo), &target).await {
///     Ok(()) => {}
///     Err(Error::NoRuleToDelete { target }) => eprintln!("{target} is not protected"),
///     Err(err) if err.is_not_found() => eprintln!("already gone: {err}"),
///     Err(err) => eprintln!("delete failed: {err}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request failed.
    ///
    /// Covers network failures, authentication failures (HTTP 401/403) and any
    /// non-success status returned by the API endpoint.
    #[error("{operation}: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: octocrab::Error,
    },

    /// The request reached GitHub but the GraphQL layer reported errors.
    #[error("{operation}: {}", join_messages(.errors))]
    GraphQl {
        operation: Operation,
        errors: Vec<GraphQlError>,
    },

    /// The response did not contain the data the operation expects.
    #[error("{operation}: invalid response format")]
    InvalidResponse { operation: Operation },

    /// The repository does not exist or is not visible with the current token.
    #[error("{operation}: repository {repository} not found")]
    RepositoryNotFound {
        operation: Operation,
        repository: String,
    },

    /// No branch protection rule exists for the requested branch or ID.
    #[error("{operation}: no branch protection rule found for {target}")]
    RuleNotFound { operation: Operation, target: String },

    /// A delete was requested for a branch or ID that has no rule.
    ///
    /// No mutation is issued when this error is returned.
    #[error("{}: no rule to delete for {target}", Operation::DeleteBranchProtectionRule)]
    NoRuleToDelete { target: String },

    /// The client could not be configured, e.g. an invalid endpoint URL.
    #[error("Failed to configure the GitHub client: {0}")]
    Configuration(String),
}

impl Error {
    /// Returns the operation that produced the error, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::Transport { operation, .. }
            | Error::GraphQl { operation, .. }
            | Error::InvalidResponse { operation }
            | Error::RepositoryNotFound { operation, .. }
            | Error::RuleNotFound { operation, .. } => Some(*operation),
            Error::NoRuleToDelete { .. } => Some(Operation::DeleteBranchProtectionRule),
            Error::Configuration(_) => None,
        }
    }

    /// Returns true when the error means the addressed object does not exist.
    ///
    /// GraphQL errors count when every reported error is of type `NOT_FOUND`.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::RepositoryNotFound { .. }
            | Error::RuleNotFound { .. }
            | Error::NoRuleToDelete { .. } => true,
            Error::GraphQl { errors, .. } => {
                !errors.is_empty() && errors.iter().all(GraphQlError::is_not_found)
            }
            _ => false,
        }
    }
}

fn join_messages(errors: &[GraphQlError]) -> String {
    if errors.is_empty() {
        return "GraphQL request failed".to_string();
    }

    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
