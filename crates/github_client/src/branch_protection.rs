//! Branch protection domain types.
//!
//! This module contains types representing GitHub branch protection rules as they
//! are read from and written to the GraphQL API. JSON field names follow the GraphQL
//! schema (camelCase) so that the output of a read can be fed back into a create.
//!
//! See: https://docs.github.com/en/graphql/reference/objects#branchprotectionrule

use serde::{Deserialize, Deserializer, Serialize};

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// The policy flags of a branch protection rule.
///
/// Missing fields and `null` values deserialize to the zero value, so `{}` is a
/// valid (fully permissive) rule definition. Unknown fields are ignored.
///
/// Each field also accepts its PascalCase spelling (`RequiresLinearHistory`), the
/// key format written by earlier releases of the `get` command.
///
/// # Examples
///
/// ```rust
/// use github_client::RuleSettings;
///
/// let settings: RuleSettings =
///     serde_json::from_str(r#"{"requiresLinearHistory": true}"#).unwrap();
/// assert!(settings.requires_linear_history);
/// assert!(!settings.allows_force_pushes);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RuleSettings {
    /// Whether the protected branch can be deleted
    #[serde(default, deserialize_with = "null_as_default", alias = "AllowsDeletions")]
    pub allows_deletions: bool,

    /// Whether force pushes are allowed
    #[serde(default, deserialize_with = "null_as_default", alias = "AllowsForcePushes")]
    pub allows_force_pushes: bool,

    /// Whether matching branches can only be created by push-allowed actors
    #[serde(default, deserialize_with = "null_as_default", alias = "BlocksCreations")]
    pub blocks_creations: bool,

    /// Whether new commits dismiss existing approvals
    #[serde(default, deserialize_with = "null_as_default", alias = "DismissesStaleReviews")]
    pub dismisses_stale_reviews: bool,

    /// Whether admins are subject to the rule
    #[serde(default, deserialize_with = "null_as_default", alias = "IsAdminEnforced")]
    pub is_admin_enforced: bool,

    /// Whether the branch is read-only
    #[serde(default, deserialize_with = "null_as_default", alias = "LockBranch")]
    pub lock_branch: bool,

    /// Whether the most recent push must be approved by someone other than the pusher
    #[serde(default, deserialize_with = "null_as_default", alias = "RequireLastPushApproval")]
    pub require_last_push_approval: bool,

    /// Number of approving reviews required before merging
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiredApprovingReviewCount")]
    pub required_approving_review_count: i32,

    /// Status check contexts that must pass before merging
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiredStatusCheckContexts")]
    pub required_status_check_contexts: Vec<String>,

    /// Whether approving reviews are required
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiresApprovingReviews")]
    pub requires_approving_reviews: bool,

    /// Whether code owner reviews are required
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiresCodeOwnerReviews")]
    pub requires_code_owner_reviews: bool,

    /// Whether commits must be signed
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiresCommitSignatures")]
    pub requires_commit_signatures: bool,

    /// Whether conversations must be resolved before merging
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiresConversationResolution")]
    pub requires_conversation_resolution: bool,

    /// Whether merge commits are prohibited
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiresLinearHistory")]
    pub requires_linear_history: bool,

    /// Whether status checks are required
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiresStatusChecks")]
    pub requires_status_checks: bool,

    /// Whether branches must be up to date before merging
    #[serde(default, deserialize_with = "null_as_default", alias = "RequiresStrictStatusChecks")]
    pub requires_strict_status_checks: bool,

    /// Whether pushing is restricted to allowed actors
    #[serde(default, deserialize_with = "null_as_default", alias = "RestrictsPushes")]
    pub restricts_pushes: bool,

    /// Whether dismissing reviews is restricted to allowed actors
    #[serde(default, deserialize_with = "null_as_default", alias = "RestrictsReviewDismissals")]
    pub restricts_review_dismissals: bool,
}

/// A branch protection rule as stored by GitHub.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct BranchProtectionRule {
    /// Node ID of the rule
    pub id: String,

    /// Glob-style branch name pattern the rule applies to
    pub pattern: String,

    /// Policy flags
    #[serde(flatten)]
    pub settings: RuleSettings,
}

/// Input of the `createBranchProtectionRule` mutation.
///
/// See: https://docs.github.com/en/graphql/reference/input-objects#createbranchprotectionruleinput
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchProtectionRuleInput {
    /// Node ID of the repository the rule is created in
    pub repository_id: String,

    /// Glob-style branch name pattern
    pub pattern: String,

    /// Policy flags, all forwarded as given
    #[serde(flatten)]
    pub settings: RuleSettings,
}

impl CreateBranchProtectionRuleInput {
    pub fn new(repository_id: impl Into<String>, pattern: impl Into<String>, settings: RuleSettings) -> Self {
        Self {
            repository_id: repository_id.into(),
            pattern: pattern.into(),
            settings,
        }
    }
}

/// Deserializes `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
