use chrono::{DateTime, Utc};
use counsel_models::news::{Article, ArticleAuthor, ArticlePage, ArticleSlug, ArticleTag, Pagination};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
    pub id: String,
    pub slug: ArticleSlug,
    pub title: String,
    pub excerpt: String,
    /// Only included when a single article is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    pub feature_image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub reading_time_minutes: Option<u32>,
    pub authors: Vec<ApiArticleAuthor>,
    pub tags: Vec<ApiArticleTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticleAuthor {
    pub name: String,
    pub profile_image_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiArticleTag {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiArticlePage {
    pub articles: Vec<ApiArticle>,
    pub pagination: ApiPagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApiPagination {
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
    pub total: u32,
    pub next: Option<u32>,
    pub prev: Option<u32>,
}

impl From<Article> for ApiArticle {
    fn from(value: Article) -> Self {
        Self {
            id: value.id,
            slug: value.slug,
            title: value.title,
            excerpt: value.excerpt,
            body_html: value.body_html,
            feature_image_url: value.feature_image_url,
            published_at: value.published_at,
            reading_time_minutes: value.reading_time_minutes,
            authors: value.authors.into_iter().map(Into::into).collect(),
            tags: value.tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ArticleAuthor> for ApiArticleAuthor {
    fn from(value: ArticleAuthor) -> Self {
        Self {
            name: value.name,
            profile_image_url: value.profile_image_url,
            bio: value.bio,
        }
    }
}

impl From<ArticleTag> for ApiArticleTag {
    fn from(value: ArticleTag) -> Self {
        Self {
            name: value.name,
            slug: value.slug,
        }
    }
}

impl From<ArticlePage> for ApiArticlePage {
    fn from(value: ArticlePage) -> Self {
        Self {
            articles: value.articles.into_iter().map(Into::into).collect(),
            pagination: value.pagination.into(),
        }
    }
}

impl From<Pagination> for ApiPagination {
    fn from(value: Pagination) -> Self {
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
