use std::future::Future;

use counsel_models::news::{Article, ArticlePage, ArticleSlug};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait CmsApiService: Send + Sync + 'static {
    /// Fetch one page of published posts, newest first.
    fn list_posts(
        &self,
        query: PostsQuery,
    ) -> impl Future<Output = Result<ArticlePage, CmsError>> + Send;

    /// Fetch a single post including its html body.
    fn get_post_by_slug(
        &self,
        slug: &ArticleSlug,
    ) -> impl Future<Output = Result<Article, CmsError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostsQuery {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("Post not found")]
    NotFound,
    #[error("CMS responded with status {0}")]
    Status(u16),
    #[error("Failed to reach the CMS: {0:#}")]
    Network(anyhow::Error),
    #[error("CMS returned a malformed response: {0:#}")]
    Malformed(anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockCmsApiService {
    pub fn with_list_posts(mut self, query: PostsQuery, result: Result<ArticlePage, CmsError>) -> Self {
        self.expect_list_posts()
            .once()
            .with(mockall::predicate::eq(query))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_get_post_by_slug(
        mut self,
        slug: ArticleSlug,
        result: Result<Article, CmsError>,
    ) -> Self {
        self.expect_get_post_by_slug()
            .once()
            .with(mockall::predicate::eq(slug))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
