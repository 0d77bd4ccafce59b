//! GraphQL documents and wire types.
//!
//! Each operation has a query document, a typed variables struct and a typed
//! response struct. Field names on the wire are fixed through serde attributes.

use serde::{Deserialize, Serialize};

use crate::{
    branch_protection::{null_as_default, BranchProtectionRule, CreateBranchProtectionRuleInput},
    errors::GraphQlError,
    models::{Page, ProtectedBranch, RuleSummary},
};

#[cfg(test)]
#[path = "graphql_tests.rs"]
mod tests;

/// Ref prefix of branch refs.
pub(crate) const BRANCH_REF_PREFIX: &str = "refs/heads/";

macro_rules! rule_fields_fragment {
    () => {
        "fragment RuleFields on BranchProtectionRule {
  id
  pattern
  allowsDeletions
  allowsForcePushes
  blocksCreations
  dismissesStaleReviews
  isAdminEnforced
  lockBranch
  requireLastPushApproval
  requiredApprovingReviewCount
  requiredStatusCheckContexts
  requiresApprovingReviews
  requiresCodeOwnerReviews
  requiresCommitSignatures
  requiresConversationResolution
  requiresLinearHistory
  requiresStatusChecks
  requiresStrictStatusChecks
  restrictsPushes
  restrictsReviewDismissals
}
"
    };
}

pub(crate) const LIST_PROTECTED_BRANCHES_QUERY: &str = "\
query ListProtectedBranches($owner: String!, $name: String!, $first: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    refs(refPrefix: \"refs/heads/\", first: $first, after: $cursor) {
      edges {
        cursor
        node {
          name
          branchProtectionRule {
            id
          }
        }
      }
      pageInfo {
        endCursor
        hasNextPage
      }
    }
  }
}
";

pub(crate) const LIST_RULES_QUERY: &str = "\
query ListBranchProtectionRules($owner: String!, $name: String!, $first: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    branchProtectionRules(first: $first, after: $cursor) {
      nodes {
        id
        pattern
      }
      pageInfo {
        endCursor
        hasNextPage
      }
    }
  }
}
";

pub(crate) const GET_RULE_FOR_BRANCH_QUERY: &str = concat!(
    "query GetBranchProtectionRuleForBranch($owner: String!, $name: String!, $qualifiedName: String!) {
  repository(owner: $owner, name: $name) {
    ref(qualifiedName: $qualifiedName) {
      branchProtectionRule {
        ...RuleFields
      }
    }
  }
}
",
    rule_fields_fragment!()
);

pub(crate) const GET_RULE_BY_ID_QUERY: &str = concat!(
    "query GetBranchProtectionRule($id: ID!) {
  node(id: $id) {
    __typename
    ...RuleFields
  }
}
",
    rule_fields_fragment!()
);

pub(crate) const GET_REPOSITORY_ID_QUERY: &str = "\
query GetRepositoryId($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    id
  }
}
";

pub(crate) const CREATE_RULE_MUTATION: &str = "\
mutation CreateBranchProtectionRule($input: CreateBranchProtectionRuleInput!) {
  createBranchProtectionRule(input: $input) {
    branchProtectionRule {
      id
      pattern
    }
  }
}
";

pub(crate) const DELETE_RULE_MUTATION: &str = "\
mutation DeleteBranchProtectionRule($branchProtectionRuleId: ID!) {
  deleteBranchProtectionRule(input: {branchProtectionRuleId: $branchProtectionRuleId}) {
    clientMutationId
  }
}
";

/// Body of a GraphQL POST.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: V,
}

/// Envelope of every GraphQL response.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<GraphQlError>,
}

// --- Variables ---

#[derive(Debug, Serialize)]
pub(crate) struct ConnectionVariables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub first: u32,
    pub cursor: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefVariables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub qualified_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NodeVariables<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RepositoryVariables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRuleVariables<'a> {
    pub input: &'a CreateBranchProtectionRuleInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteRuleVariables<'a> {
    pub branch_protection_rule_id: &'a str,
}

// --- Responses ---

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryData<R> {
    pub repository: Option<R>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefsRepository {
    pub refs: Option<RefConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefConnection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<Option<RefEdge>>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefEdge {
    pub node: Option<RefNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefNode {
    pub name: String,
    pub branch_protection_rule: Option<RuleIdNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RuleIdNode {
    pub id: Option<String>,
}

impl From<RefConnection> for Page<ProtectedBranch> {
    /// Keeps the refs that have a rule ID; a ref can exist without a rule.
    fn from(connection: RefConnection) -> Self {
        let items = connection
            .edges
            .into_iter()
            .flatten()
            .filter_map(|edge| edge.node)
            .filter_map(|node| {
                let rule_id = node.branch_protection_rule?.id?;
                Some(ProtectedBranch {
                    name: node.name,
                    rule_id,
                })
            })
            .collect();

        Page {
            items,
            end_cursor: connection.page_info.end_cursor,
            has_next_page: connection.page_info.has_next_page,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RulesRepository {
    pub branch_protection_rules: RuleConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleConnection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Option<RuleSummary>>,
    pub page_info: PageInfo,
}

impl From<RuleConnection> for Page<RuleSummary> {
    fn from(connection: RuleConnection) -> Self {
        Page {
            items: connection.nodes.into_iter().flatten().collect(),
            end_cursor: connection.page_info.end_cursor,
            has_next_page: connection.page_info.has_next_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefRepository {
    #[serde(rename = "ref")]
    pub git_ref: Option<RefWithRule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefWithRule {
    pub branch_protection_rule: Option<BranchProtectionRule>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeData {
    pub node: Option<Node>,
}

/// A node narrowed to a branch protection rule.
///
/// Other node types only carry `__typename`, so the rule fields are optional.
#[derive(Debug, Deserialize)]
pub(crate) struct Node {
    #[serde(rename = "__typename")]
    pub typename: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryIdNode {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRuleData {
    pub create_branch_protection_rule: Option<CreateRulePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRulePayload {
    pub branch_protection_rule: Option<RuleSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteRuleData {
    pub delete_branch_protection_rule: Option<DeleteRulePayload>,
}

/// The payload only carries `clientMutationId`, which is never set.
#[derive(Debug, Deserialize)]
pub(crate) struct DeleteRulePayload {}

/// Returns the fully qualified ref name of a branch.
pub(crate) fn qualified_branch_name(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("{BRANCH_REF_PREFIX}{branch}")
    }
}
