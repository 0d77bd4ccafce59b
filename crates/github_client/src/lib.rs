//! Crate for managing branch protection rules through the GitHub GraphQL API.
//!
//! This crate provides a client for making token-authenticated GraphQL requests to
//! GitHub or GitHub Enterprise Server, typed request and response structures for the
//! branch protection operations, a cursor-based pagination walker, and the rule
//! operations built on top of them (see [`protection`]).

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::{Error, GraphQlError, Operation};

pub mod branch_protection;
pub use branch_protection::{BranchProtectionRule, CreateBranchProtectionRuleInput, RuleSettings};

pub mod endpoint;
pub use endpoint::ApiEndpoint;

mod graphql;

pub mod models;
pub use models::{Page, ProtectedBranch, RepositoryRef, RuleSummary, RuleTarget, DEFAULT_HOST};

pub mod pagination;

pub mod protection;

use graphql::{
    qualified_branch_name, ConnectionVariables, CreateRuleData, CreateRuleVariables,
    DeleteRuleData, DeleteRuleVariables, GraphQlRequest, GraphQlResponse, NodeData,
    NodeVariables, RefRepository, RefVariables, RefsRepository, RepositoryData, RepositoryIdNode,
    RepositoryVariables, RulesRepository, CREATE_RULE_MUTATION, DELETE_RULE_MUTATION,
    GET_REPOSITORY_ID_QUERY, GET_RULE_BY_ID_QUERY, GET_RULE_FOR_BRANCH_QUERY,
    LIST_PROTECTED_BRANCHES_QUERY, LIST_RULES_QUERY,
};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// GraphQL type name of branch protection rule nodes.
const RULE_TYPENAME: &str = "BranchProtectionRule";

/// A client for the GitHub GraphQL API, authenticated with a token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
    graphql_path: String,
}

impl GitHubClient {
    /// Creates a client posting GraphQL requests to `/graphql` on the client's base URI.
    pub fn new(client: Octocrab) -> Self {
        Self::with_graphql_path(client, "/graphql")
    }

    /// Creates a client posting GraphQL requests to `graphql_path`.
    pub fn with_graphql_path(client: Octocrab, graphql_path: impl Into<String>) -> Self {
        Self {
            client,
            graphql_path: graphql_path.into(),
        }
    }

    /// Creates a token-authenticated client for an endpoint.
    ///
    /// # Errors
    /// Returns an `Error::Configuration` if the client cannot be built.
    pub fn for_endpoint(endpoint: &ApiEndpoint, token: &str) -> Result<Self, Error> {
        let client = create_token_client(token, &endpoint.base_uri)?;
        Ok(Self::with_graphql_path(client, endpoint.graphql_path.clone()))
    }

    /// Sends one GraphQL request and unwraps the response envelope.
    ///
    /// Any entry in the `errors` array fails the whole request; there are no
    /// partial results.
    async fn send<V, T>(&self, operation: Operation, query: &str, variables: V) -> Result<T, Error>
    where
        V: Serialize + Send + Sync,
        T: DeserializeOwned + Send,
    {
        let request = GraphQlRequest {
            query,
            operation_name: operation.as_str(),
            variables,
        };

        debug!(operation = %operation, path = %self.graphql_path, "Sending GraphQL request");

        let response: GraphQlResponse<T> = self
            .client
            .post(&self.graphql_path, Some(&request))
            .await
            .map_err(|e| {
                log_octocrab_error(&format!("{operation} request failed"), &e);
                Error::Transport {
                    operation,
                    source: e,
                }
            })?;

        if !response.errors.is_empty() {
            for e in &response.errors {
                error!(
                    operation = %operation,
                    error_type = e.error_type.as_deref().unwrap_or("UNKNOWN"),
                    error_message = %e.message,
                    "GraphQL error"
                );
            }

            return Err(Error::GraphQl {
                operation,
                errors: response.errors,
            });
        }

        response.data.ok_or_else(|| {
            error!(operation = %operation, "GraphQL response has no data");
            Error::InvalidResponse { operation }
        })
    }
}

/// Trait for the branch protection operations of the GraphQL API.
///
/// Each method issues exactly one request. Multi-request flows (walking all pages,
/// looking a rule up before deleting it) live in [`protection`] and only use this
/// trait, so they can run against any implementation.
#[async_trait]
pub trait BranchProtectionClient: Send + Sync {
    /// Fetches one page of the branch refs of a repository, keeping only the refs
    /// that have a protection rule attached.
    ///
    /// # Errors
    /// Returns `Error::RepositoryNotFound` if the repository is not visible, or the
    /// transport/GraphQL error of the request.
    async fn protected_branches_page(
        &self,
        repo: &RepositoryRef,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<Page<ProtectedBranch>, Error>;

    /// Fetches one page of the branch protection rules of a repository.
    ///
    /// # Errors
    /// Returns `Error::RepositoryNotFound` if the repository is not visible, or the
    /// transport/GraphQL error of the request.
    async fn rules_page(
        &self,
        repo: &RepositoryRef,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<Page<RuleSummary>, Error>;

    /// Fetches the rule attached to a branch.
    ///
    /// # Errors
    /// Returns `Error::RuleNotFound` if the branch does not exist or has no rule.
    async fn rule_for_branch(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> Result<BranchProtectionRule, Error>;

    /// Fetches a rule by node ID.
    ///
    /// # Errors
    /// Returns `Error::RuleNotFound` if no branch protection rule has that ID.
    async fn rule_by_id(&self, rule_id: &str) -> Result<BranchProtectionRule, Error>;

    /// Resolves the node ID of a repository.
    ///
    /// # Errors
    /// Returns `Error::RepositoryNotFound` if the repository is not visible.
    async fn repository_id(&self, repo: &RepositoryRef) -> Result<String, Error>;

    /// Creates a rule and returns its identity.
    ///
    /// # Errors
    /// Returns `Error::GraphQl` with the API's messages if the rule is rejected, for
    /// example when the pattern is already protected.
    async fn create_rule(
        &self,
        input: &CreateBranchProtectionRuleInput,
    ) -> Result<RuleSummary, Error>;

    /// Deletes a rule by node ID.
    ///
    /// # Errors
    /// Returns `Error::GraphQl` if the rule no longer exists or cannot be deleted.
    async fn delete_rule(&self, rule_id: &str) -> Result<(), Error>;
}

#[async_trait]
impl BranchProtectionClient for GitHubClient {
    #[instrument(skip(self), fields(repository = %repo))]
    async fn protected_branches_page(
        &self,
        repo: &RepositoryRef,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<Page<ProtectedBranch>, Error> {
        let operation = Operation::ListProtectedBranches;
        let data: RepositoryData<RefsRepository> = self
            .send(
                operation,
                LIST_PROTECTED_BRANCHES_QUERY,
                ConnectionVariables {
                    owner: &repo.owner,
                    name: &repo.name,
                    first: page_size,
                    cursor: cursor.as_deref(),
                },
            )
            .await?;

        let repository = data
            .repository
            .ok_or_else(|| repository_not_found(operation, repo))?;
        let refs = repository
            .refs
            .ok_or(Error::InvalidResponse { operation })?;

        Ok(Page::from(refs))
    }

    #[instrument(skip(self), fields(repository = %repo))]
    async fn rules_page(
        &self,
        repo: &RepositoryRef,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<Page<RuleSummary>, Error> {
        let operation = Operation::ListBranchProtectionRules;
        let data: RepositoryData<RulesRepository> = self
            .send(
                operation,
                LIST_RULES_QUERY,
                ConnectionVariables {
                    owner: &repo.owner,
                    name: &repo.name,
                    first: page_size,
                    cursor: cursor.as_deref(),
                },
            )
            .await?;

        let repository = data
            .repository
            .ok_or_else(|| repository_not_found(operation, repo))?;

        Ok(Page::from(repository.branch_protection_rules))
    }

    #[instrument(skip(self), fields(repository = %repo, branch = %branch))]
    async fn rule_for_branch(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> Result<BranchProtectionRule, Error> {
        let operation = Operation::GetBranchProtectionRuleForBranch;
        let data: RepositoryData<RefRepository> = self
            .send(
                operation,
                GET_RULE_FOR_BRANCH_QUERY,
                RefVariables {
                    owner: &repo.owner,
                    name: &repo.name,
                    qualified_name: qualified_branch_name(branch),
                },
            )
            .await?;

        let repository = data
            .repository
            .ok_or_else(|| repository_not_found(operation, repo))?;

        let not_found = || Error::RuleNotFound {
            operation,
            target: RuleTarget::Branch(branch.to_string()).to_string(),
        };

        let Some(git_ref) = repository.git_ref else {
            debug!("Branch does not exist");
            return Err(not_found());
        };

        git_ref.branch_protection_rule.ok_or_else(not_found)
    }

    #[instrument(skip(self))]
    async fn rule_by_id(&self, rule_id: &str) -> Result<BranchProtectionRule, Error> {
        let operation = Operation::GetBranchProtectionRule;
        let not_found = || Error::RuleNotFound {
            operation,
            target: RuleTarget::Id(rule_id.to_string()).to_string(),
        };

        let data: NodeData = match self
            .send(operation, GET_RULE_BY_ID_QUERY, NodeVariables { id: rule_id })
            .await
        {
            Ok(data) => data,
            Err(e) if e.is_not_found() => return Err(not_found()),
            Err(e) => return Err(e),
        };

        let node = data
            .node
            .filter(|node| node.typename == RULE_TYPENAME)
            .ok_or_else(not_found)?;

        serde_json::from_value(serde_json::Value::Object(node.fields)).map_err(|e| {
            error!(error = %e, "Failed to decode branch protection rule node");
            Error::InvalidResponse { operation }
        })
    }

    #[instrument(skip(self), fields(repository = %repo))]
    async fn repository_id(&self, repo: &RepositoryRef) -> Result<String, Error> {
        let operation = Operation::GetRepositoryId;
        let data: RepositoryData<RepositoryIdNode> = self
            .send(
                operation,
                GET_REPOSITORY_ID_QUERY,
                RepositoryVariables {
                    owner: &repo.owner,
                    name: &repo.name,
                },
            )
            .await?;

        let repository = data
            .repository
            .ok_or_else(|| repository_not_found(operation, repo))?;

        debug!(repository_id = %repository.id, "Resolved repository ID");
        Ok(repository.id)
    }

    #[instrument(skip(self, input), fields(pattern = %input.pattern))]
    async fn create_rule(
        &self,
        input: &CreateBranchProtectionRuleInput,
    ) -> Result<RuleSummary, Error> {
        let operation = Operation::CreateBranchProtectionRule;
        let data: CreateRuleData = self
            .send(
                operation,
                CREATE_RULE_MUTATION,
                CreateRuleVariables { input },
            )
            .await?;

        let rule = data
            .create_branch_protection_rule
            .and_then(|payload| payload.branch_protection_rule)
            .ok_or(Error::InvalidResponse { operation })?;

        info!(rule_id = %rule.id, pattern = %rule.pattern, "Created branch protection rule");
        Ok(rule)
    }

    #[instrument(skip(self))]
    async fn delete_rule(&self, rule_id: &str) -> Result<(), Error> {
        let operation = Operation::DeleteBranchProtectionRule;
        let data: DeleteRuleData = self
            .send(
                operation,
                DELETE_RULE_MUTATION,
                DeleteRuleVariables {
                    branch_protection_rule_id: rule_id,
                },
            )
            .await?;

        if data.delete_branch_protection_rule.is_none() {
            return Err(Error::InvalidResponse { operation });
        }

        info!(rule_id = rule_id, "Deleted branch protection rule");
        Ok(())
    }
}

fn repository_not_found(operation: Operation, repo: &RepositoryRef) -> Error {
    error!(operation = %operation, repository = %repo, "Repository not found");
    Error::RepositoryNotFound {
        operation,
        repository: repo.to_string(),
    }
}

/// Creates an `Octocrab` client authenticated with a personal or OAuth token.
///
/// # Arguments
///
/// * `token` - The access token.
/// * `base_uri` - The API base URI, e.g. `https://api.github.com`.
///
/// # Errors
///
/// Returns `Error::Configuration` if the base URI is invalid or the client cannot
/// be built.
#[instrument(skip(token))]
pub fn create_token_client(token: &str, base_uri: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .base_uri(base_uri)
        .map_err(|e| Error::Configuration(format!("Invalid API base URI '{base_uri}': {e}")))?
        .personal_token(token.to_string())
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to build Octocrab client");
            Error::Configuration(format!("Failed to build the GitHub client: {e}"))
        })
}

fn log_octocrab_error(message: &str, e: &octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => error!(
            error_message = %source.message,
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::UriParse { source, .. } => error!(
            error_message = %source,
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = %source,
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Json { source, .. } => error!(
            error_message = %source,
            "{}. The response could not be decoded.",
            message
        ),
        _ => error!(error_message = %e, "{}", message),
    };
}
