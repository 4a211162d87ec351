use std::time::Duration;

use counsel_extern_contracts::cms::{CmsApiService, CmsError, PostsQuery};
use counsel_extern_impl::cms::{CmsApiServiceConfig, CmsApiServiceImpl};
use counsel_models::news::ArticleSlug;
use counsel_testing::cms::{self, CmsTestConfig, MALFORMED_SLUG};
use counsel_utils::assert_matches;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn list_posts() {
    let sut = setup("test-key").await;

    let result = sut
        .list_posts(PostsQuery { page: 1, limit: 6 })
        .await
        .unwrap();

    assert_eq!(result.articles.len(), 6);
    assert_eq!(
        *result.articles[0].slug,
        "changes-to-the-employment-act"
    );
    assert_eq!(result.articles[0].body_html, None);
    assert_eq!(result.articles[0].authors[0].name, "Grace Wanjiku");
    assert_eq!(result.articles[0].tags[0].slug, "employment");
    assert!(result
        .articles
        .windows(2)
        .all(|w| w[0].published_at >= w[1].published_at));
    assert_eq!(result.pagination.page, 1);
    assert_eq!(result.pagination.pages, 2);
    assert_eq!(result.pagination.total, 8);
    assert_eq!(result.pagination.next, Some(2));
    assert_eq!(result.pagination.prev, None);

    let result = sut
        .list_posts(PostsQuery { page: 2, limit: 6 })
        .await
        .unwrap();

    assert_eq!(result.articles.len(), 2);
    assert_eq!(*result.articles[1].slug, "welcome");
    assert_eq!(result.pagination.next, None);
    assert_eq!(result.pagination.prev, Some(1));
}

#[tokio::test]
async fn list_posts_past_last_page() {
    let sut = setup("test-key").await;

    let result = sut
        .list_posts(PostsQuery { page: 5, limit: 6 })
        .await
        .unwrap();

    assert!(result.articles.is_empty());
}

#[tokio::test]
async fn invalid_key() {
    let sut = setup("wrong-key").await;

    let result = sut.list_posts(PostsQuery { page: 1, limit: 6 }).await;
    assert_matches!(result, Err(CmsError::Status(401)));
}

#[tokio::test]
async fn get_post_by_slug() {
    let sut = setup("test-key").await;

    let result = sut
        .get_post_by_slug(&slug("child-custody-basics"))
        .await
        .unwrap();

    assert_eq!(result.title, "Child Custody Basics");
    assert_eq!(
        result.body_html.as_deref(),
        Some("<h2>Child Custody Basics</h2><p>Lorem ipsum dolor sit amet.</p>")
    );
}

#[tokio::test]
async fn get_post_by_slug_not_found() {
    let sut = setup("test-key").await;

    let result = sut.get_post_by_slug(&slug("does-not-exist")).await;
    assert_matches!(result, Err(CmsError::NotFound));
}

#[tokio::test]
async fn get_post_by_slug_malformed() {
    let sut = setup("test-key").await;

    let result = sut.get_post_by_slug(&slug(MALFORMED_SLUG)).await;
    assert_matches!(result, Err(CmsError::Malformed(_)));
}

#[tokio::test]
async fn unreachable() {
    let config = CmsApiServiceConfig::new(
        &"http://127.0.0.1:1/ghost/api/v3/content/".parse().unwrap(),
        "test-key",
        Duration::from_secs(5),
    )
    .unwrap();
    let sut = CmsApiServiceImpl::new(config);

    let result = sut.list_posts(PostsQuery { page: 1, limit: 6 }).await;
    assert_matches!(result, Err(CmsError::Network(_)));
}

async fn setup(api_key: &str) -> CmsApiServiceImpl {
    let addr = counsel_testing::spawn(cms::router(CmsTestConfig::default()))
        .await
        .unwrap();
    let endpoint = format!("http://{addr}{}", cms::CONTENT_API_ROUTE)
        .parse()
        .unwrap();

    let config = CmsApiServiceConfig::new(&endpoint, api_key, Duration::from_secs(5)).unwrap();
    CmsApiServiceImpl::new(config)
}

fn slug(slug: &str) -> ArticleSlug {
    slug.try_into().unwrap()
}
