use std::future::Future;

use counsel_models::news::{Article, ArticlePage, ArticleSlug};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait NewsFeatureService: Send + Sync + 'static {
    /// Return one page of the latest articles. `page` starts at 1.
    fn list_articles(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<ArticlePage, NewsListArticlesError>> + Send;

    /// Return a single article including its body.
    fn get_article(
        &self,
        slug: &ArticleSlug,
    ) -> impl Future<Output = Result<Article, NewsGetArticleError>> + Send;
}

#[derive(Debug, Error)]
pub enum NewsListArticlesError {
    #[error("Failed to load articles after {attempts} attempts: {last_error:#}")]
    Unavailable {
        attempts: u32,
        last_error: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum NewsGetArticleError {
    #[error("Article not found")]
    NotFound,
    #[error("Failed to load article: {0:#}")]
    Unavailable(anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockNewsFeatureService {
    pub fn with_list_articles(
        mut self,
        page: u32,
        result: Result<ArticlePage, NewsListArticlesError>,
    ) -> Self {
        self.expect_list_articles()
            .once()
            .with(mockall::predicate::eq(page))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_get_article(
        mut self,
        slug: ArticleSlug,
        result: Result<Article, NewsGetArticleError>,
    ) -> Self {
        self.expect_get_article()
            .once()
            .with(mockall::predicate::eq(slug))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
