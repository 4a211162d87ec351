use counsel_core_news_contracts::{NewsFeatureService, NewsGetArticleError, NewsListArticlesError};
use counsel_extern_contracts::cms::{CmsApiService, CmsError, PostsQuery};
use counsel_models::news::{Article, ArticlePage, ArticleSlug};
use counsel_utils::retry::RetryPolicy;
use tracing::{error, instrument, warn};

#[derive(Debug, Clone)]
pub struct NewsFeatureServiceImpl<Cms> {
    cms: Cms,
    config: NewsFeatureConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct NewsFeatureConfig {
    pub page_size: u32,
    pub retry: RetryPolicy,
}

impl<Cms> NewsFeatureServiceImpl<Cms> {
    pub fn new(cms: Cms, config: NewsFeatureConfig) -> Self {
        Self { cms, config }
    }
}

impl<Cms> NewsFeatureService for NewsFeatureServiceImpl<Cms>
where
    Cms: CmsApiService,
{
    #[instrument(skip(self))]
    async fn list_articles(&self, page: u32) -> Result<ArticlePage, NewsListArticlesError> {
        let query = PostsQuery {
            page: page.max(1),
            limit: self.config.page_size,
        };

        let mut retries = 0;
        loop {
            let err = match self.cms.list_posts(query).await {
                Ok(page) => return Ok(page),
                Err(err) => err,
            };

            retries += 1;
            let Some(delay) = self.config.retry.delay(retries) else {
                error!(error = %err, attempts = retries, "failed to load articles");
                return Err(NewsListArticlesError::Unavailable {
                    attempts: retries,
                    last_error: err.into(),
                });
            };

            warn!(error = %err, retry = retries, ?delay, "failed to load articles, retrying");
            tokio::time::sleep(delay).await;
        }
    }

    #[instrument(skip(self))]
    async fn get_article(&self, slug: &ArticleSlug) -> Result<Article, NewsGetArticleError> {
        self.cms.get_post_by_slug(slug).await.map_err(|err| match err {
            CmsError::NotFound => NewsGetArticleError::NotFound,
            err => {
                error!(error = %err, "failed to load article");
                NewsGetArticleError::Unavailable(err.into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use anyhow::anyhow;
    use counsel_extern_contracts::cms::MockCmsApiService;
    use counsel_models::news::Pagination;
    use counsel_utils::assert_matches;
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::*;

    #[tokio::test]
    async fn list_articles() {
        // Arrange
        let expected = ArticlePage {
            articles: vec![article()],
            pagination: Pagination::single(2, 6, 1),
        };
        let cms = MockCmsApiService::new()
            .with_list_posts(PostsQuery { page: 2, limit: 6 }, Ok(expected.clone()));

        let sut = NewsFeatureServiceImpl::new(cms, config());

        // Act
        let result = sut.list_articles(2).await;

        // Assert
        assert_eq!(result.unwrap(), expected);
    }

    #[tokio::test]
    async fn list_articles_first_page() {
        // Arrange
        let cms = MockCmsApiService::new().with_list_posts(
            PostsQuery { page: 1, limit: 6 },
            Ok(ArticlePage {
                articles: vec![],
                pagination: Pagination::single(1, 6, 0),
            }),
        );

        let sut = NewsFeatureServiceImpl::new(cms, config());

        // Act
        let result = sut.list_articles(0).await;

        // Assert
        assert!(result.unwrap().articles.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn list_articles_retry_then_ok() {
        // Arrange
        let mut responses = vec![
            Ok(ArticlePage {
                articles: vec![article()],
                pagination: Pagination::single(1, 6, 1),
            }),
            Err(CmsError::Malformed(anyhow!("missing posts"))),
        ];
        let mut cms = MockCmsApiService::new();
        cms.expect_list_posts()
            .times(2)
            .returning(move |_| Box::pin(std::future::ready(responses.pop().unwrap())));

        let sut = NewsFeatureServiceImpl::new(cms, config());
        let start = Instant::now();

        // Act
        let result = sut.list_articles(1).await;

        // Assert
        assert_eq!(result.unwrap().articles, [article()]);
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn list_articles_unavailable() {
        // Arrange
        let attempts = Arc::new(Mutex::new(Vec::new()));
        let mut cms = MockCmsApiService::new();
        cms.expect_list_posts().times(3).returning({
            let attempts = Arc::clone(&attempts);
            move |_| {
                attempts.lock().unwrap().push(Instant::now());
                Box::pin(std::future::ready(Err(CmsError::Status(500))))
            }
        });

        let sut = NewsFeatureServiceImpl::new(cms, config());

        // Act
        let result = sut.list_articles(1).await;

        // Assert
        assert_matches!(
            result,
            Err(NewsListArticlesError::Unavailable { attempts: 3, .. })
        );
        let attempts = attempts.lock().unwrap();
        assert_eq!(
            attempts.windows(2).map(|w| w[1] - w[0]).collect::<Vec<_>>(),
            [Duration::from_millis(2000), Duration::from_millis(4000)]
        );
    }

    #[tokio::test]
    async fn get_article() {
        // Arrange
        let cms = MockCmsApiService::new().with_get_post_by_slug(slug(), Ok(article()));

        let sut = NewsFeatureServiceImpl::new(cms, config());

        // Act
        let result = sut.get_article(&slug()).await;

        // Assert
        assert_eq!(result.unwrap(), article());
    }

    #[tokio::test]
    async fn get_article_not_found() {
        // Arrange
        let cms = MockCmsApiService::new().with_get_post_by_slug(slug(), Err(CmsError::NotFound));

        let sut = NewsFeatureServiceImpl::new(cms, config());

        // Act
        let result = sut.get_article(&slug()).await;

        // Assert
        assert_matches!(result, Err(NewsGetArticleError::NotFound));
    }

    #[tokio::test]
    async fn get_article_unavailable() {
        // Arrange
        let cms =
            MockCmsApiService::new().with_get_post_by_slug(slug(), Err(CmsError::Status(502)));

        let sut = NewsFeatureServiceImpl::new(cms, config());

        // Act
        let result = sut.get_article(&slug()).await;

        // Assert
        assert_matches!(result, Err(NewsGetArticleError::Unavailable(_)));
    }

    fn config() -> NewsFeatureConfig {
        NewsFeatureConfig {
            page_size: 6,
            retry: RetryPolicy::new(2, Duration::from_millis(2000)),
        }
    }

    fn slug() -> ArticleSlug {
        "changes-to-the-employment-act".try_into().unwrap()
    }

    fn article() -> Article {
        Article {
            id: "65f0c1d2e3a4b5c6d7e8f900".into(),
            slug: slug(),
            title: "Changes to the Employment Act".into(),
            excerpt: "What you need to know.".into(),
            body_html: Some("<p>Lorem ipsum</p>".into()),
            feature_image_url: None,
            published_at: "2024-06-12T05:00:00Z".parse().unwrap(),
            reading_time_minutes: Some(3),
            authors: vec![],
            tags: vec![],
        }
    }
}
