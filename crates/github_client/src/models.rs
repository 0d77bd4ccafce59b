//! # Models
//!
//! Data models shared by the client and its callers: repository references, rule
//! targets, connection pages and the entries returned by the list operations.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The host used when none is specified.
pub const DEFAULT_HOST: &str = "github.com";

/// Prefix of current-format branch protection rule node IDs.
const RULE_NODE_ID_PREFIX: &str = "BPR_";

/// Type name embedded in legacy (base64) branch protection rule node IDs.
const LEGACY_RULE_TYPE_NAME: &str = ":BranchProtectionRule";

/// Identifies a repository on a GitHub host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RepositoryRef {
    /// Host name, e.g. `github.com` or a GitHub Enterprise Server host
    pub host: String,
    /// The owner of the repository (user or organization name)
    pub owner: String,
    /// The name of the repository
    pub name: String,
}

impl RepositoryRef {
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns `host/owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}/{}", self.host, self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// What a `get` or `delete` addresses: a rule node ID or a branch name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleTarget {
    /// A branch protection rule node ID.
    Id(String),
    /// A branch whose rule is looked up through its ref.
    Branch(String),
}

impl RuleTarget {
    /// Classifies a command-line value.
    ///
    /// Values starting with `BPR_`, and legacy IDs that base64-decode to
    /// `NNN:BranchProtectionRuleNNN`, are node IDs. Anything else is a branch name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use github_client::RuleTarget;
    ///
    /// assert_eq!(RuleTarget::parse("BPR_kwDOAAAB"), RuleTarget::Id("BPR_kwDOAAAB".to_string()));
    /// assert_eq!(RuleTarget::parse("main"), RuleTarget::Branch("main".to_string()));
    /// ```
    pub fn parse(value: &str) -> Self {
        if value.starts_with(RULE_NODE_ID_PREFIX) || is_legacy_rule_id(value) {
            RuleTarget::Id(value.to_string())
        } else {
            RuleTarget::Branch(value.to_string())
        }
    }

    /// Returns the raw value.
    pub fn as_str(&self) -> &str {
        match self {
            RuleTarget::Id(id) => id,
            RuleTarget::Branch(branch) => branch,
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self, RuleTarget::Id(_))
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTarget::Id(id) => write!(f, "rule {id}"),
            RuleTarget::Branch(branch) => write!(f, "branch {branch}"),
        }
    }
}

fn is_legacy_rule_id(value: &str) -> bool {
    let Ok(bytes) = STANDARD.decode(value) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(bytes) else {
        return false;
    };

    match decoded.split_once(LEGACY_RULE_TYPE_NAME) {
        Some((prefix, suffix)) => {
            !prefix.is_empty()
                && prefix.chars().all(|c| c.is_ascii_digit())
                && !suffix.is_empty()
                && suffix.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// A branch that has a protection rule attached.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedBranch {
    /// Short branch name, e.g. `main`
    pub name: String,
    /// Node ID of the rule protecting the branch
    pub rule_id: String,
}

/// The identity of a branch protection rule.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSummary {
    /// Node ID of the rule
    pub id: String,
    /// Glob-style branch name pattern
    pub pattern: String,
}

/// One page of a GraphQL connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    /// Entries of the page, in server order
    pub items: Vec<T>,
    /// Cursor of the last entry, used to request the next page
    pub end_cursor: Option<String>,
    /// Whether more pages follow
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// A final page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            end_cursor: None,
            has_next_page: false,
        }
    }

    /// A page followed by another one starting after `end_cursor`.
    pub fn with_next(items: Vec<T>, end_cursor: impl Into<String>) -> Self {
        Self {
            items,
            end_cursor: Some(end_cursor.into()),
            has_next_page: true,
        }
    }
}
