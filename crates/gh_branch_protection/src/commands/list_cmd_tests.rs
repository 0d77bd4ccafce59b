use super::*;
use crate::commands::mock_client::{branch, test_repo, Call, MockClient};
use github_client::RuleSummary;

#[tokio::test]
async fn test_list_prints_branches_across_pages() {
    let client = MockClient::new().with_branch_pages(vec![
        vec![branch("main", "BPR_1")],
        vec![branch("feature/x", "BPR_2")],
    ]);
    let repo = test_repo();
    let ctx = CommandContext {
        client: &client,
        repository: Some(&repo),
        page_size: 100,
    };
    let mut out = Vec::new();

    execute(&ctx, &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "main\nfeature/x\n");
    assert_eq!(
        client.calls(),
        vec![
            Call::ProtectedBranchesPage {
                page_size: 100,
                cursor: None
            },
            Call::ProtectedBranchesPage {
                page_size: 100,
                cursor: Some("c1".to_string())
            },
        ]
    );
}

#[tokio::test]
async fn test_list_empty_repository_prints_nothing() {
    let client = MockClient::new().with_branch_pages(vec![vec![]]);
    let repo = test_repo();
    let ctx = CommandContext {
        client: &client,
        repository: Some(&repo),
        page_size: 100,
    };
    let mut out = Vec::new();

    execute(&ctx, &mut out).await.unwrap();

    assert!(out.is_empty());
}

#[tokio::test]
async fn test_list_uses_configured_page_size() {
    let client = MockClient::new().with_branch_pages(vec![vec![]]);
    let repo = test_repo();
    let ctx = CommandContext {
        client: &client,
        repository: Some(&repo),
        page_size: 10,
    };

    execute(&ctx, &mut Vec::new()).await.unwrap();

    assert_eq!(
        client.calls(),
        vec![Call::ProtectedBranchesPage {
            page_size: 10,
            cursor: None
        }]
    );
}

#[tokio::test]
async fn test_list_rules_prints_id_and_pattern() {
    let client = MockClient::new().with_rule_pages(vec![vec![
        RuleSummary {
            id: "BPR_1".to_string(),
            pattern: "main".to_string(),
        },
        RuleSummary {
            id: "BPR_2".to_string(),
            pattern: "release/*".to_string(),
        },
    ]]);
    let repo = test_repo();
    let ctx = CommandContext {
        client: &client,
        repository: Some(&repo),
        page_size: 100,
    };
    let mut out = Vec::new();

    execute_rules(&ctx, &mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "BPR_1\tmain\nBPR_2\trelease/*\n"
    );
}

#[tokio::test]
async fn test_list_without_repository() {
    let client = MockClient::new();
    let ctx = CommandContext {
        client: &client,
        repository: None,
        page_size: 100,
    };

    let result = execute(&ctx, &mut Vec::new()).await;

    assert!(matches!(result, Err(Error::Repository(_))));
    assert!(client.calls().is_empty());
}
