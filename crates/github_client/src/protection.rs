//! Branch protection operations spanning one or more GraphQL requests.

use tracing::{info, instrument, warn};

use crate::{
    branch_protection::{BranchProtectionRule, CreateBranchProtectionRuleInput, RuleSettings},
    errors::Operation,
    models::{ProtectedBranch, RepositoryRef, RuleSummary, RuleTarget},
    pagination::walk_pages,
    BranchProtectionClient, Error,
};

#[cfg(test)]
#[path = "protection_tests.rs"]
mod tests;

/// Lists every branch of the repository that has a protection rule attached, in
/// the order the API returns them.
///
/// # Errors
///
/// Returns the error of the first page request that fails; pages fetched before
/// it are discarded. `Error::InvalidResponse` is returned if a page claims a
/// successor but carries no cursor.
#[instrument(skip(client), fields(repository = %repo))]
pub async fn list_protected_branches(
    client: &dyn BranchProtectionClient,
    repo: &RepositoryRef,
    page_size: u32,
) -> Result<Vec<ProtectedBranch>, Error> {
    let branches = walk_pages(Operation::ListProtectedBranches, move |cursor| {
        client.protected_branches_page(repo, page_size, cursor)
    })
    .await?;

    info!(count = branches.len(), "Listed protected branches");
    Ok(branches)
}

/// Lists every branch protection rule of the repository.
///
/// # Errors
///
/// Same as [`list_protected_branches`]: the first failing page aborts the walk.
#[instrument(skip(client), fields(repository = %repo))]
pub async fn list_rules(
    client: &dyn BranchProtectionClient,
    repo: &RepositoryRef,
    page_size: u32,
) -> Result<Vec<RuleSummary>, Error> {
    let rules = walk_pages(Operation::ListBranchProtectionRules, move |cursor| {
        client.rules_page(repo, page_size, cursor)
    })
    .await?;

    info!(count = rules.len(), "Listed branch protection rules");
    Ok(rules)
}

/// Looks up the rule a target refers to.
///
/// A rule ID is resolved directly and needs no repository; a branch name is
/// resolved against `repo`.
///
/// # Errors
///
/// Returns `Error::RuleNotFound` if there is no such rule, or
/// `Error::Configuration` if a branch is given without a repository.
#[instrument(skip(client))]
pub async fn find_rule(
    client: &dyn BranchProtectionClient,
    repo: Option<&RepositoryRef>,
    target: &RuleTarget,
) -> Result<BranchProtectionRule, Error> {
    match target {
        RuleTarget::Id(id) => client.rule_by_id(id).await,
        RuleTarget::Branch(branch) => {
            let repo = repo.ok_or_else(|| {
                Error::Configuration(format!("A repository is required to look up {target}"))
            })?;
            client.rule_for_branch(repo, branch).await
        }
    }
}

/// Creates a rule for `pattern` in the repository.
///
/// Absent settings are sent as their zero values, so the new rule is fully
/// described by `settings`. An existing rule with the same pattern is not merged;
/// whatever the API reports for it is returned as the error.
///
/// # Errors
///
/// Returns `Error::RepositoryNotFound` if the repository ID cannot be resolved, in
/// which case no mutation is sent. Otherwise returns the mutation's
/// transport or GraphQL error.
#[instrument(skip(client, settings), fields(repository = %repo))]
pub async fn create_rule_for_pattern(
    client: &dyn BranchProtectionClient,
    repo: &RepositoryRef,
    pattern: &str,
    settings: RuleSettings,
) -> Result<RuleSummary, Error> {
    let repository_id = client.repository_id(repo).await?;
    let input = CreateBranchProtectionRuleInput::new(repository_id, pattern, settings);
    client.create_rule(&input).await
}

/// Deletes the rule a target refers to and returns the deleted rule's ID.
///
/// The rule is looked up first; the delete mutation is only issued once the rule
/// is known to exist.
///
/// # Errors
///
/// Returns `Error::NoRuleToDelete` if the lookup finds no rule. Any other lookup or
/// mutation error is returned unchanged.
#[instrument(skip(client))]
pub async fn delete_rule_for_target(
    client: &dyn BranchProtectionClient,
    repo: Option<&RepositoryRef>,
    target: &RuleTarget,
) -> Result<String, Error> {
    let rule = match find_rule(client, repo, target).await {
        Ok(rule) => rule,
        Err(Error::RuleNotFound { .. }) => {
            warn!("No rule to delete");
            return Err(Error::NoRuleToDelete {
                target: target.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    client.delete_rule(&rule.id).await?;
    Ok(rule.id)
}
