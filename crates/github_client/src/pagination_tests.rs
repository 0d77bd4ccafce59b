use super::*;
use std::sync::{Arc, Mutex};

/// Serves `pages` in order, chaining them through cursors `c1`, `c2`, ...
/// and recording the cursor of every request.
async fn walk_chained<T: Clone>(
    pages: Vec<Vec<T>>,
    requested: Arc<Mutex<Vec<Option<String>>>>,
) -> Result<Vec<T>, Error> {
    let total = pages.len();
    walk_pages(Operation::ListProtectedBranches, move |cursor| {
        requested.lock().unwrap().push(cursor.clone());
        let index = match cursor.as_deref() {
            None => 0,
            Some(c) => c.trim_start_matches('c').parse::<usize>().unwrap(),
        };
        let items = pages[index].clone();
        async move {
            if index + 1 < total {
                Ok(Page::with_next(items, format!("c{}", index + 1)))
            } else {
                Ok(Page::last(items))
            }
        }
    })
    .await
}

#[tokio::test]
async fn test_walk_single_page() {
    let requested = Arc::new(Mutex::new(vec![]));

    let result = walk_chained(vec![vec!["main", "dev"]], requested.clone())
        .await
        .unwrap();

    assert_eq!(result, vec!["main", "dev"]);
    assert_eq!(*requested.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn test_walk_empty_connection_is_not_an_error() {
    let requested = Arc::new(Mutex::new(vec![]));

    let result: Vec<&str> = walk_chained(vec![vec![]], requested).await.unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_walk_follows_cursors_in_order() {
    let requested = Arc::new(Mutex::new(vec![]));

    let result = walk_chained(
        vec![vec!["a", "b"], vec![], vec!["c"], vec!["d", "e"]],
        requested.clone(),
    )
    .await
    .unwrap();

    assert_eq!(result, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(
        *requested.lock().unwrap(),
        vec![
            None,
            Some("c1".to_string()),
            Some("c2".to_string()),
            Some("c3".to_string())
        ]
    );
}

#[tokio::test]
async fn test_walk_result_is_concatenation_for_any_page_layout() {
    for page_size in 0..4usize {
        for page_count in 1..5usize {
            let mut pages = Vec::new();
            let mut expected = Vec::new();
            for page in 0..page_count {
                let items: Vec<(usize, usize)> = (0..page_size).map(|i| (page, i)).collect();
                expected.extend(items.iter().copied());
                pages.push(items);
            }

            let requested = Arc::new(Mutex::new(vec![]));
            let result = walk_chained(pages, requested.clone()).await.unwrap();

            assert_eq!(result, expected, "size {page_size}, pages {page_count}");
            assert_eq!(requested.lock().unwrap().len(), page_count);
        }
    }
}

#[tokio::test]
async fn test_walk_aborts_on_failed_page() {
    let mut calls = 0;

    let result: Result<Vec<u32>, Error> =
        walk_pages(Operation::ListBranchProtectionRules, |cursor| {
            calls += 1;
            async move {
                match cursor {
                    None => Ok(Page::with_next(vec![1, 2], "c1")),
                    Some(_) => Err(Error::GraphQl {
                        operation: Operation::ListBranchProtectionRules,
                        errors: vec![],
                    }),
                }
            }
        })
        .await;

    assert!(matches!(result, Err(Error::GraphQl { .. })));
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn test_walk_rejects_next_page_without_cursor() {
    let result: Result<Vec<u32>, Error> =
        walk_pages(Operation::ListProtectedBranches, |_| async {
            Ok(Page {
                items: vec![1],
                end_cursor: None,
                has_next_page: true,
            })
        })
        .await;

    match result {
        Err(Error::InvalidResponse { operation }) => {
            assert_eq!(operation, Operation::ListProtectedBranches)
        }
        other => panic!("Expected InvalidResponse, got {other:?}"),
    }
}
