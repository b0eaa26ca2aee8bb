//! Orchestration tests for `Paginator` against an in-memory repository.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use paginator_core::{
    EntityColumns, EntityIdentity, Error, FindOperator, FindOptions, FindQuery, PageRepository,
    PageRequest, PaginationConfig, Paginator, SortSpec, Where,
};
use tracing_test::traced_test;

#[derive(Clone, Debug, PartialEq)]
struct Post {
    id: i64,
    title: String,
}

// Mock repository: honors skip/take, records the last query
struct MockPostsRepository {
    entity: EntityIdentity,
    rows: Vec<Post>,
    last_query: Mutex<Option<FindQuery>>,
    fail: bool,
}

impl MockPostsRepository {
    fn with_rows(n: i64) -> Self {
        Self {
            entity: EntityIdentity::new("posts", "Post"),
            rows: (1..=n)
                .map(|id| Post {
                    id,
                    title: format!("Post {id}"),
                })
                .collect(),
            last_query: Mutex::new(None),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_rows(0)
        }
    }

    fn last_query(&self) -> FindQuery {
        self.last_query
            .lock()
            .unwrap()
            .clone()
            .expect("repository was not called")
    }

    fn was_called(&self) -> bool {
        self.last_query.lock().unwrap().is_some()
    }
}

#[async_trait::async_trait]
impl PageRepository for MockPostsRepository {
    type Item = Post;

    fn entity(&self) -> &EntityIdentity {
        &self.entity
    }

    async fn find_and_count(&self, query: FindQuery) -> anyhow::Result<(Vec<Post>, u64)> {
        *self.last_query.lock().unwrap() = Some(query.clone());
        if self.fail {
            return Err(anyhow!("connection reset"));
        }
        let items = self
            .rows
            .iter()
            .skip(query.skip as usize)
            .take(query.take as usize)
            .cloned()
            .collect();
        Ok((items, self.rows.len() as u64))
    }
}

fn config() -> Arc<PaginationConfig> {
    Arc::new(
        PaginationConfig::default()
            .with_columns("Post", EntityColumns::new(["id", "title"], ["id", "title"])),
    )
}

fn paginator(rows: i64) -> Paginator<Arc<MockPostsRepository>> {
    Paginator::new(Arc::new(MockPostsRepository::with_rows(rows)), config())
}

fn request(page: Option<i64>, limit: Option<i64>) -> PageRequest {
    PageRequest {
        page,
        limit,
        ..PageRequest::default()
    }
}

#[tokio::test]
async fn default_request_returns_first_page() {
    let p = paginator(230);
    let page = p.get_all(&PageRequest::default(), None).await.unwrap();

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].id, 1);
    assert_eq!(page.meta.page, 1);
    assert_eq!(page.meta.total_items, 230);
    assert_eq!(page.meta.total_pages, 46);
    assert_eq!(page.links.first, "?page=1&limit=5&sort=id:ASC");
    assert_eq!(page.links.last, "?page=46&limit=5&sort=id:ASC");
    assert_eq!(page.links.previous, "");
    assert_eq!(page.links.next, "");

    let query = p.repository().last_query();
    assert_eq!(query.order, SortSpec::fallback());
    assert_eq!(query.filter, Where::default());
    assert_eq!((query.skip, query.take), (0, 5));
    assert!(query.relations.is_empty());
}

#[tokio::test]
async fn twenty_three_items_make_five_pages() {
    let p = paginator(23);
    let page = p.get_all(&request(Some(1), Some(5)), None).await.unwrap();

    assert_eq!(page.meta.total_pages, 5);
    assert_eq!(page.links.last, "?page=5&limit=5&sort=id:ASC");
}

#[tokio::test]
async fn oversized_limit_is_capped() {
    let p = paginator(250);
    let out = p.paginate(&request(Some(1), Some(500)), None).await.unwrap();

    assert_eq!(out.pagination.limit, 200);
    assert_eq!(out.items.len(), 200);
    assert_eq!(out.into_page().meta.total_pages, 2);
}

#[tokio::test]
async fn zero_and_negative_pages_resolve_to_first_page() {
    let p = paginator(30);
    let zero = p.get_all(&request(Some(0), Some(10)), None).await.unwrap();
    let negative = p.get_all(&request(Some(-1), Some(10)), None).await.unwrap();

    assert_eq!(zero.meta.page, 1);
    assert_eq!(zero, negative);
}

#[tokio::test]
async fn page_beyond_data_is_empty_not_an_error() {
    let p = paginator(12);
    let page = p.get_all(&request(Some(9), Some(5)), None).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.meta.page, 9);
    assert_eq!(page.meta.total_pages, 3);
    assert_eq!(p.repository().last_query().skip, 40);
}

#[tokio::test]
async fn sort_is_canonicalized_in_query_and_links() {
    let p = paginator(10);
    let req = PageRequest {
        sort: Some("title:desc,unknown,id".into()),
        path: "/posts".into(),
        ..PageRequest::default()
    };
    let page = p.get_all(&req, None).await.unwrap();

    assert_eq!(page.links.first, "/posts?page=1&limit=5&sort=title:DESCid:ASC");
    let query = p.repository().last_query();
    assert_eq!(query.order.to_canonical_string(), "title:DESCid:ASC");
}

#[tokio::test]
async fn unknown_sort_column_falls_back_to_id() {
    let p = paginator(10);
    let req = PageRequest {
        sort: Some("unknown:asc".into()),
        ..PageRequest::default()
    };
    let out = p.paginate(&req, None).await.unwrap();
    assert_eq!(out.pagination.sort, "id:ASC");
}

#[tokio::test]
async fn filter_and_caller_constraint_are_merged() {
    let p = paginator(10);
    let filter = r#"{"id":"Not(IsNull())","body":"dropped"}"#;
    let req = PageRequest {
        filter: Some(filter.into()),
        ..PageRequest::default()
    };
    let options = FindOptions::new()
        .with_constraint(Where::Any(vec![Where::eq("authorId", "1")]))
        .with_relations(["user"]);

    let out = p.paginate(&req, Some(options)).await.unwrap();

    let query = p.repository().last_query();
    assert_eq!(
        query.filter,
        Where::Any(vec![
            Where::from_iter([("id".to_string(), FindOperator::not(FindOperator::is_null()))]),
            Where::eq("authorId", "1"),
        ])
    );
    assert_eq!(query.relations, vec!["user".to_string()]);
    // echoed unmodified
    assert_eq!(out.pagination.filter.as_deref(), Some(filter));
    assert!(out
        .into_page()
        .links
        .first
        .ends_with(&format!("&filter={filter}")));
}

#[tokio::test]
async fn malformed_filter_never_reaches_the_repository() {
    let p = paginator(10);
    let req = PageRequest {
        filter: Some("{not json".into()),
        ..PageRequest::default()
    };
    let err = p.paginate(&req, None).await.unwrap_err();

    assert!(matches!(err, Error::MalformedFilter(_)));
    assert!(!p.repository().was_called());
}

#[tokio::test]
async fn repository_errors_propagate_unchanged() {
    let p = Paginator::new(MockPostsRepository::failing(), config());
    let err = p.paginate(&PageRequest::default(), None).await.unwrap_err();

    assert!(matches!(err, Error::Repository(_)));
    assert!(!err.is_client_error());
    assert_eq!(err.to_string(), "connection reset");
}

#[tokio::test]
#[traced_test]
async fn paginate_is_instrumented() {
    let p = paginator(10);
    let req = PageRequest {
        sort: Some("nope".into()),
        ..PageRequest::default()
    };
    p.paginate(&req, None).await.unwrap();

    assert!(logs_contain("paginator.paginate"));
    assert!(logs_contain("dropping sort token"));
    assert!(logs_contain("page fetched"));
}
