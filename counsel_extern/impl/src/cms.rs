use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use counsel_extern_contracts::cms::{CmsApiService, CmsError, PostsQuery};
use counsel_models::news::{
    Article, ArticleAuthor, ArticlePage, ArticleSlug, ArticleTag, Pagination,
};
use reqwest::{header::ACCEPT, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::http::HttpClient;

const INCLUDE: &str = "tags,authors";
const LIST_FIELDS: &str = "id,slug,title,excerpt,feature_image,published_at,reading_time";
const FORMATS: &str = "html";

/// Client for the Ghost Content API.
///
/// https://ghost.org/docs/content-api/
#[derive(Debug, Clone)]
pub struct CmsApiServiceImpl {
    config: CmsApiServiceConfig,
    http: HttpClient,
}

#[derive(Debug, Clone)]
pub struct CmsApiServiceConfig {
    posts_url: Arc<Url>,
    api_key: Arc<str>,
    timeout: Duration,
}

impl CmsApiServiceConfig {
    /// `endpoint` is the content api base url, e.g.
    /// `https://example.ghost.io/ghost/api/v3/content/`.
    pub fn new(endpoint: &Url, api_key: impl Into<Arc<str>>, timeout: Duration) -> anyhow::Result<Self> {
        let posts_url = endpoint
            .join("posts/")
            .with_context(|| format!("Failed to build posts url from {endpoint}"))?;

        Ok(Self {
            posts_url: posts_url.into(),
            api_key: api_key.into(),
            timeout,
        })
    }
}

impl CmsApiServiceImpl {
    pub fn new(config: CmsApiServiceConfig) -> Self {
        Self {
            config,
            http: HttpClient::default(),
        }
    }

    async fn get(&self, url: Url) -> Result<PostsResponse, CmsError> {
        tokio::time::timeout(self.config.timeout, self.fetch(url))
            .await
            .map_err(|_| {
                CmsError::Network(anyhow!(
                    "CMS request timed out after {:?}",
                    self.config.timeout
                ))
            })?
    }

    async fn fetch(&self, url: Url) -> Result<PostsResponse, CmsError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| CmsError::Network(anyhow!(err).context("Failed to send posts request")))?;

        let status = response.status();
        debug!(%status, "received posts response");
        match status {
            StatusCode::NOT_FOUND => return Err(CmsError::NotFound),
            status if !status.is_success() => return Err(CmsError::Status(status.as_u16())),
            _ => {}
        }

        let body = response.bytes().await.map_err(|err| {
            CmsError::Network(anyhow!(err).context("Failed to read posts response"))
        })?;

        serde_json::from_slice(&body)
            .map_err(|err| CmsError::Malformed(anyhow!(err).context("Failed to deserialize posts response")))
    }

    fn with_key(&self, mut url: Url) -> Url {
        url.query_pairs_mut()
            .append_pair("key", &self.config.api_key)
            .append_pair("include", INCLUDE)
            .append_pair("formats", FORMATS);
        url
    }
}

impl CmsApiService for CmsApiServiceImpl {
    #[instrument(skip(self))]
    async fn list_posts(&self, query: PostsQuery) -> Result<ArticlePage, CmsError> {
        let mut url = self.with_key((*self.config.posts_url).clone());
        url.query_pairs_mut()
            .append_pair("limit", &query.limit.to_string())
            .append_pair("page", &query.page.to_string())
            .append_pair("fields", LIST_FIELDS);

        let response = self.get(url).await?;

        let posts = response
            .posts
            .ok_or_else(|| CmsError::Malformed(anyhow!("Response does not contain a posts list")))?;
        let articles = posts
            .into_iter()
            .map(Article::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(CmsError::Malformed)?;

        let pagination = match response.meta {
            Some(meta) => meta.pagination.into(),
            None => Pagination::single(query.page, query.limit, articles.len() as u32),
        };

        Ok(ArticlePage {
            articles,
            pagination,
        })
    }

    #[instrument(skip(self))]
    async fn get_post_by_slug(&self, slug: &ArticleSlug) -> Result<Article, CmsError> {
        let url = self
            .config
            .posts_url
            .join(&format!("slug/{}/", **slug))
            .context("Failed to build post url")?;
        let url = self.with_key(url);

        let response = self.get(url).await?;

        let post = response
            .posts
            .ok_or_else(|| CmsError::Malformed(anyhow!("Response does not contain a posts list")))?
            .into_iter()
            .next()
            .ok_or(CmsError::NotFound)?;

        post.try_into().map_err(CmsError::Malformed)
    }
}

#[derive(Deserialize)]
struct PostsResponse {
    posts: Option<Vec<Post>>,
    meta: Option<Meta>,
}

#[derive(Deserialize)]
struct Post {
    id: String,
    slug: String,
    title: String,
    excerpt: Option<String>,
    html: Option<String>,
    feature_image: Option<String>,
    published_at: DateTime<Utc>,
    reading_time: Option<u32>,
    #[serde(default)]
    authors: Vec<Author>,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize)]
struct Author {
    name: String,
    profile_image: Option<String>,
    bio: Option<String>,
}

#[derive(Deserialize)]
struct Tag {
    name: String,
    slug: String,
}

#[derive(Deserialize)]
struct Meta {
    pagination: MetaPagination,
}

#[derive(Deserialize)]
struct MetaPagination {
    page: u32,
    limit: u32,
    pages: u32,
    total: u32,
    next: Option<u32>,
    prev: Option<u32>,
}

impl TryFrom<Post> for Article {
    type Error = anyhow::Error;

    fn try_from(value: Post) -> Result<Self, Self::Error> {
        let slug = ArticleSlug::try_new(value.slug.as_str())
            .map_err(|_| anyhow!("Invalid post slug {:?}", value.slug))?;

        Ok(Self {
            id: value.id,
            slug,
            title: value.title,
            excerpt: value.excerpt.unwrap_or_default(),
            body_html: value.html,
            feature_image_url: value.feature_image,
            published_at: value.published_at,
            reading_time_minutes: value.reading_time,
            authors: value
                .authors
                .into_iter()
                .map(|author| ArticleAuthor {
                    name: author.name,
                    profile_image_url: author.profile_image,
                    bio: author.bio,
                })
                .collect(),
            tags: value
                .tags
                .into_iter()
                .map(|tag| ArticleTag {
                    name: tag.name,
                    slug: tag.slug,
                })
                .collect(),
        })
    }
}

impl From<MetaPagination> for Pagination {
    fn from(value: MetaPagination) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
            pages: value.pages,
            total: value.total,
            next: value.next,
            prev: value.prev,
        }
    }
}
