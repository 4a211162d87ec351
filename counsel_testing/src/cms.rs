use std::{net::IpAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

pub const CONTENT_API_ROUTE: &str = "/ghost/api/v3/content/";
const POSTS_ROUTE: &str = "/ghost/api/v3/content/posts/";
const POST_BY_SLUG_ROUTE: &str = "/ghost/api/v3/content/posts/slug/:slug/";

/// Requesting this slug returns a response without a posts list.
pub const MALFORMED_SLUG: &str = "malformed-response";

const DEFAULT_LIMIT: usize = 15;

#[derive(Debug, Clone)]
pub struct CmsTestConfig {
    pub api_key: String,
}

impl Default for CmsTestConfig {
    fn default() -> Self {
        Self {
            api_key: "test-key".into(),
        }
    }
}

pub async fn start_server(host: IpAddr, port: u16, config: CmsTestConfig) -> anyhow::Result<()> {
    info!("Starting cms testing server on {host}:{port}");
    info!("Content API endpoint: http://{host}:{port}{CONTENT_API_ROUTE}");
    info!("API key: {:?}", config.api_key);
    info!("Serving {} posts", fixtures().len());

    crate::serve(router(config), host, port).await
}

pub fn router(config: CmsTestConfig) -> Router {
    Router::new()
        .route(POSTS_ROUTE, routing::get(list_posts))
        .route(POST_BY_SLUG_ROUTE, routing::get(get_post))
        .with_state(Arc::new(CmsState {
            config,
            posts: fixtures(),
        }))
}

struct CmsState {
    config: CmsTestConfig,
    posts: Vec<Map<String, Value>>,
}

#[derive(Deserialize)]
struct PostsQuery {
    key: Option<String>,
    limit: Option<usize>,
    page: Option<usize>,
    fields: Option<String>,
    include: Option<String>,
    formats: Option<String>,
}

impl PostsQuery {
    /// Shape a post like Ghost does for the requested `fields`, `include`
    /// and `formats` parameters.
    fn project(&self, post: &Map<String, Value>) -> Map<String, Value> {
        let include = split(self.include.as_deref());
        let formats = split(self.formats.as_deref());
        let fields = self.fields.as_deref().map(|fields| split(Some(fields)));

        post.iter()
            .filter(|(key, _)| match key.as_str() {
                "authors" | "tags" => include.contains(&key.as_str()),
                "html" if !formats.contains(&"html") => false,
                key => fields.as_ref().map_or(true, |fields| fields.contains(&key)),
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn split(value: Option<&str>) -> Vec<&str> {
    value
        .map(|value| value.split(',').map(str::trim).collect())
        .unwrap_or_default()
}

async fn list_posts(State(state): State<Arc<CmsState>>, Query(query): Query<PostsQuery>) -> Response {
    if query.key.as_deref() != Some(state.config.api_key.as_str()) {
        return unauthorized();
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let total = state.posts.len();
    let pages = total.div_ceil(limit).max(1);

    let posts = state
        .posts
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .map(|post| query.project(post))
        .collect::<Vec<_>>();

    Json(json!({
        "posts": posts,
        "meta": {
            "pagination": {
                "page": page,
                "limit": limit,
                "pages": pages,
                "total": total,
                "next": (page < pages).then_some(page + 1),
                "prev": (page > 1).then(|| page - 1),
            }
        }
    }))
    .into_response()
}

async fn get_post(
    State(state): State<Arc<CmsState>>,
    Path(slug): Path<String>,
    Query(query): Query<PostsQuery>,
) -> Response {
    if query.key.as_deref() != Some(state.config.api_key.as_str()) {
        return unauthorized();
    }

    if slug == MALFORMED_SLUG {
        return Json(json!({"post": null})).into_response();
    }

    match state
        .posts
        .iter()
        .find(|post| post.get("slug").and_then(Value::as_str) == Some(slug.as_str())) {
        Some(post) => Json(json!({"posts": [query.project(post)]})).into_response(),
        None => error(StatusCode::NOT_FOUND, "NotFoundError", "Resource not found"),
    }
}

fn unauthorized() -> Response {
    error(
        StatusCode::UNAUTHORIZED,
        "UnauthorizedError",
        "Unknown Content API Key",
    )
}

fn error(status: StatusCode, ty: &str, message: &str) -> Response {
    (
        status,
        Json(json!({"errors": [{"message": message, "type": ty}]})),
    )
        .into_response()
}

/// Sample posts, newest first.
pub fn fixtures() -> Vec<Map<String, Value>> {
    let author = json!({
        "name": "Grace Wanjiku",
        "profile_image": "https://images.example/authors/grace.jpg",
        "bio": "Partner, Employment and Labour Relations",
    });

    [
        ("changes-to-the-employment-act", "Changes to the Employment Act", "employment", "2024-06-12T08:00:00.000+03:00"),
        ("registering-a-business-name", "Registering a Business Name", "corporate", "2024-05-28T10:15:00.000+03:00"),
        ("succession-without-a-will", "Succession Without a Will", "succession", "2024-05-02T09:00:00.000+03:00"),
        ("land-search-before-purchase", "Why You Need a Land Search Before Purchase", "land", "2024-04-18T11:30:00.000+03:00"),
        ("child-custody-basics", "Child Custody Basics", "family", "2024-03-30T14:45:00.000+03:00"),
        ("data-protection-compliance", "Data Protection Compliance for Small Firms", "corporate", "2024-03-07T08:20:00.000+03:00"),
        ("tax-appeals-tribunal", "Appealing to the Tax Appeals Tribunal", "tax", "2024-02-14T13:00:00.000+03:00"),
        ("welcome", "Welcome to Our News Page", "news", "2024-01-08T07:00:00.000+03:00"),
    ]
    .into_iter()
    .enumerate()
    .map(|(n, (slug, title, tag, published_at))| {
        let post = json!({
            "id": format!("65f0c1d2e3a4b5c6d7e8f9{n:02}"),
            "slug": slug,
            "title": title,
            "excerpt": format!("{title}: what you need to know."),
            "html": format!("<h2>{title}</h2><p>Lorem ipsum dolor sit amet.</p>"),
            "feature_image": format!("https://images.example/posts/{slug}.jpg"),
            "published_at": published_at,
            "reading_time": n % 5 + 2,
            "authors": [author],
            "tags": [{"name": capitalize(tag), "slug": tag}],
        });
        match post {
            Value::Object(post) => post,
            _ => unreachable!(),
        }
    })
    .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
