//! In-memory `BranchProtectionClient` for command tests.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use github_client::{
    BranchProtectionClient, BranchProtectionRule, CreateBranchProtectionRuleInput, Error,
    Operation, Page, ProtectedBranch, RepositoryRef, RuleSettings, RuleSummary, RuleTarget,
};

/// A request the mock received.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ProtectedBranchesPage { page_size: u32, cursor: Option<String> },
    RulesPage { page_size: u32, cursor: Option<String> },
    RuleForBranch(String),
    RuleById(String),
    RepositoryId(String),
    CreateRule(CreateBranchProtectionRuleInput),
    DeleteRule(String),
}

/// Serves pages chained through cursors `c1`, `c2`, ... and rules from memory.
#[derive(Default)]
pub struct MockClient {
    branch_pages: Vec<Vec<ProtectedBranch>>,
    rule_pages: Vec<Vec<RuleSummary>>,
    rules: Vec<BranchProtectionRule>,
    branches: HashMap<String, String>,
    repository_id: Option<String>,
    fail_delete: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            repository_id: Some("R_1".to_string()),
            ..Default::default()
        }
    }

    pub fn with_branch_pages(mut self, pages: Vec<Vec<ProtectedBranch>>) -> Self {
        self.branch_pages = pages;
        self
    }

    pub fn with_rule_pages(mut self, pages: Vec<Vec<RuleSummary>>) -> Self {
        self.rule_pages = pages;
        self
    }

    /// Adds a rule and attaches it to `branches`.
    pub fn with_rule(mut self, rule: BranchProtectionRule, branches: &[&str]) -> Self {
        for branch in branches {
            self.branches.insert(branch.to_string(), rule.id.clone());
        }
        self.rules.push(rule);
        self
    }

    pub fn without_repository(mut self) -> Self {
        self.repository_id = None;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn serve<T: Clone>(pages: &[Vec<T>], cursor: Option<&str>) -> Page<T> {
        let index = match cursor {
            None => 0,
            Some(c) => c.trim_start_matches('c').parse::<usize>().unwrap(),
        };
        let items = pages.get(index).cloned().unwrap_or_default();
        if index + 1 < pages.len() {
            Page::with_next(items, format!("c{}", index + 1))
        } else {
            Page::last(items)
        }
    }
}

pub fn rule(id: &str, pattern: &str) -> BranchProtectionRule {
    BranchProtectionRule {
        id: id.to_string(),
        pattern: pattern.to_string(),
        settings: RuleSettings {
            requires_linear_history: true,
            required_approving_review_count: 1,
            ..Default::default()
        },
    }
}

pub fn branch(name: &str, rule_id: &str) -> ProtectedBranch {
    ProtectedBranch {
        name: name.to_string(),
        rule_id: rule_id.to_string(),
    }
}

pub fn test_repo() -> RepositoryRef {
    RepositoryRef::new("github.com", "octo", "hello")
}

#[async_trait]
impl BranchProtectionClient for MockClient {
    async fn protected_branches_page(
        &self,
        _repo: &RepositoryRef,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<Page<ProtectedBranch>, Error> {
        self.record(Call::ProtectedBranchesPage {
            page_size,
            cursor: cursor.clone(),
        });
        Ok(Self::serve(&self.branch_pages, cursor.as_deref()))
    }

    async fn rules_page(
        &self,
        _repo: &RepositoryRef,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<Page<RuleSummary>, Error> {
        self.record(Call::RulesPage {
            page_size,
            cursor: cursor.clone(),
        });
        Ok(Self::serve(&self.rule_pages, cursor.as_deref()))
    }

    async fn rule_for_branch(
        &self,
        _repo: &RepositoryRef,
        branch: &str,
    ) -> Result<BranchProtectionRule, Error> {
        self.record(Call::RuleForBranch(branch.to_string()));
        self.branches
            .get(branch)
            .and_then(|id| self.rules.iter().find(|r| &r.id == id))
            .cloned()
            .ok_or_else(|| Error::RuleNotFound {
                operation: Operation::GetBranchProtectionRuleForBranch,
                target: RuleTarget::Branch(branch.to_string()).to_string(),
            })
    }

    async fn rule_by_id(&self, rule_id: &str) -> Result<BranchProtectionRule, Error> {
        self.record(Call::RuleById(rule_id.to_string()));
        self.rules
            .iter()
            .find(|r| r.id == rule_id)
            .cloned()
            .ok_or_else(|| Error::RuleNotFound {
                operation: Operation::GetBranchProtectionRule,
                target: RuleTarget::Id(rule_id.to_string()).to_string(),
            })
    }

    async fn repository_id(&self, repo: &RepositoryRef) -> Result<String, Error> {
        self.record(Call::RepositoryId(repo.to_string()));
        self.repository_id
            .clone()
            .ok_or_else(|| Error::RepositoryNotFound {
                operation: Operation::GetRepositoryId,
                repository: repo.to_string(),
            })
    }

    async fn create_rule(
        &self,
        input: &CreateBranchProtectionRuleInput,
    ) -> Result<RuleSummary, Error> {
        self.record(Call::CreateRule(input.clone()));
        Ok(RuleSummary {
            id: "BPR_created".to_string(),
            pattern: input.pattern.clone(),
        })
    }

    async fn delete_rule(&self, rule_id: &str) -> Result<(), Error> {
        self.record(Call::DeleteRule(rule_id.to_string()));
        if self.fail_delete {
            return Err(Error::GraphQl {
                operation: Operation::DeleteBranchProtectionRule,
                errors: vec![],
            });
        }
        Ok(())
    }
}
