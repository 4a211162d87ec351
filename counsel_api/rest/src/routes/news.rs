use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use counsel_core_news_contracts::{NewsFeatureService, NewsGetArticleError, NewsListArticlesError};
use counsel_models::news::ArticleSlug;
use serde::Deserialize;
use tracing::error;

use super::error;
use crate::models::news::{ApiArticle, ApiArticlePage};

pub fn router(service: Arc<impl NewsFeatureService>) -> Router<()> {
    Router::new()
        .route("/news", routing::get(list_articles))
        .route("/news/:slug", routing::get(get_article))
        .with_state(service)
}

#[derive(Deserialize)]
struct ListArticlesQuery {
    #[serde(default = "first_page")]
    page: u32,
}

fn first_page() -> u32 {
    1
}

async fn list_articles(
    service: State<Arc<impl NewsFeatureService>>,
    Query(ListArticlesQuery { page }): Query<ListArticlesQuery>,
) -> Response {
    match service.list_articles(page).await {
        Ok(page) => Json(ApiArticlePage::from(page)).into_response(),
        Err(err @ NewsListArticlesError::Unavailable { .. }) => {
            error!(error = %err, page, "failed to list articles");
            unavailable()
        }
    }
}

async fn get_article(
    service: State<Arc<impl NewsFeatureService>>,
    Path(slug): Path<String>,
) -> Response {
    // nothing is published under a slug the cms would not generate
    let Ok(slug) = ArticleSlug::try_new(slug) else {
        return error(StatusCode::NOT_FOUND, "Article not found");
    };

    match service.get_article(&slug).await {
        Ok(article) => Json(ApiArticle::from(article)).into_response(),
        Err(NewsGetArticleError::NotFound) => error(StatusCode::NOT_FOUND, "Article not found"),
        Err(NewsGetArticleError::Unavailable(err)) => {
            error!(error = format!("{err:#}"), slug = slug.as_str(), "failed to get article");
            unavailable()
        }
    }
}

fn unavailable() -> Response {
    error(
        StatusCode::SERVICE_UNAVAILABLE,
        "News are currently unavailable",
    )
}
