use std::net::SocketAddr;

use anyhow::anyhow;
use counsel_api_rest::{RestServer, RestServerConfig};
use counsel_core_contact_contracts::MockContactFeatureService;
use counsel_core_news_contracts::{MockNewsFeatureService, NewsGetArticleError, NewsListArticlesError};
use counsel_models::{
    contact::{ContactField, ContactFormInput, FieldError, SubmissionResult},
    news::{Article, ArticlePage, ArticleSlug, Pagination},
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health() {
    let addr = spawn(MockContactFeatureService::new(), MockNewsFeatureService::new()).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.json::<Value>().await.unwrap(), json!(true));
}

#[tokio::test]
async fn contact_success() {
    let contact = MockContactFeatureService::new().with_submit(
        jane_doe(),
        SubmissionResult::Success {
            item_id: "4711".try_into().unwrap(),
        },
    );
    let addr = spawn(contact, MockNewsFeatureService::new()).await;

    let (status, body) = post_contact(addr, jane_doe_json()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "itemId": "4711"}));
}

#[tokio::test]
async fn contact_email_fallback() {
    let contact = MockContactFeatureService::new().with_submit(
        jane_doe(),
        SubmissionResult::EmailFallback {
            mailto: "mailto:info@example.com?subject=s&body=b".into(),
            reason: "CRM rejected the request: X".into(),
        },
    );
    let addr = spawn(contact, MockNewsFeatureService::new()).await;

    let (status, body) = post_contact(addr, jane_doe_json()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "email_fallback");
    assert_eq!(body["mailto"], "mailto:info@example.com?subject=s&body=b");
}

#[tokio::test]
async fn contact_validation_error() {
    let contact = MockContactFeatureService::new().with_submit(
        ContactFormInput::default(),
        SubmissionResult::ValidationError {
            field_errors: [(ContactField::Email, FieldError::Required)]
                .into_iter()
                .collect(),
        },
    );
    let addr = spawn(contact, MockNewsFeatureService::new()).await;

    let (status, body) = post_contact(addr, json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({
            "status": "validation_error",
            "fieldErrors": {"email": "This field is required"},
        })
    );
}

#[tokio::test]
async fn contact_network_error() {
    let contact = MockContactFeatureService::new().with_submit(
        jane_doe(),
        SubmissionResult::NetworkError { retries_left: 0 },
    );
    let addr = spawn(contact, MockNewsFeatureService::new()).await;

    let (status, body) = post_contact(addr, jane_doe_json()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "network_error", "retriesLeft": 0}));
}

#[tokio::test]
async fn contact_null_field() {
    let contact = MockContactFeatureService::new().with_submit(
        jane_doe(),
        SubmissionResult::Success {
            item_id: "4711".try_into().unwrap(),
        },
    );
    let addr = spawn(contact, MockNewsFeatureService::new()).await;

    let mut body = jane_doe_json();
    body["phone"] = Value::Null;
    let (status, body) = post_contact(addr, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "itemId": "4711"}));
}

#[tokio::test]
async fn contact_invalid_body() {
    let addr = spawn(MockContactFeatureService::new(), MockNewsFeatureService::new()).await;

    let mut body = jane_doe_json();
    body["firstName"] = json!(42);
    let (status, body) = post_contact(addr, body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"detail": "Invalid contact form"}));
}

#[tokio::test]
async fn cors_allowed_origins() {
    let config = RestServerConfig {
        allowed_origins: vec!["https://soklaw.co.ke".parse().unwrap()],
    };
    let addr = spawn_with_config(
        MockContactFeatureService::new(),
        MockNewsFeatureService::new(),
        config,
    )
    .await;

    assert_eq!(
        allowed_origin(addr, "https://soklaw.co.ke").await.as_deref(),
        Some("https://soklaw.co.ke")
    );
    assert_eq!(allowed_origin(addr, "https://evil.example").await, None);
}

#[tokio::test]
async fn cors_any_origin() {
    let addr = spawn(MockContactFeatureService::new(), MockNewsFeatureService::new()).await;

    assert_eq!(
        allowed_origin(addr, "https://evil.example").await.as_deref(),
        Some("*")
    );
}

#[tokio::test]
async fn list_news() {
    let news = MockNewsFeatureService::new().with_list_articles(
        2,
        Ok(ArticlePage {
            articles: vec![article()],
            pagination: Pagination {
                page: 2,
                limit: 6,
                pages: 2,
                total: 7,
                next: None,
                prev: Some(1),
            },
        }),
    );
    let addr = spawn(MockContactFeatureService::new(), news).await;

    let response = reqwest::get(format!("http://{addr}/news?page=2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "articles": [{
                "id": "1",
                "slug": "welcome",
                "title": "Welcome",
                "excerpt": "Hello",
                "featureImageUrl": null,
                "publishedAt": "2024-01-08T04:00:00Z",
                "readingTimeMinutes": 2,
                "authors": [],
                "tags": [],
            }],
            "pagination": {"page": 2, "limit": 6, "pages": 2, "total": 7, "next": null, "prev": 1},
        })
    );
}

#[tokio::test]
async fn list_news_default_page() {
    let news = MockNewsFeatureService::new().with_list_articles(
        1,
        Err(NewsListArticlesError::Unavailable {
            attempts: 3,
            last_error: anyhow!("cms responded with status 500"),
        }),
    );
    let addr = spawn(MockContactFeatureService::new(), news).await;

    let response = reqwest::get(format!("http://{addr}/news")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "News are currently unavailable"})
    );
}

#[tokio::test]
async fn get_article() {
    let news = MockNewsFeatureService::new().with_get_article(
        slug(),
        Ok(Article {
            body_html: Some("<p>Hi</p>".into()),
            ..article()
        }),
    );
    let addr = spawn(MockContactFeatureService::new(), news).await;

    let response = reqwest::get(format!("http://{addr}/news/welcome")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["bodyHtml"], "<p>Hi</p>");
    assert_eq!(body["slug"], "welcome");
}

#[tokio::test]
async fn get_article_not_found() {
    let news = MockNewsFeatureService::new()
        .with_get_article(slug(), Err(NewsGetArticleError::NotFound));
    let addr = spawn(MockContactFeatureService::new(), news).await;

    for path in ["welcome", "Not%20A%20Slug"] {
        let response = reqwest::get(format!("http://{addr}/news/{path}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>().await.unwrap(),
            json!({"detail": "Article not found"})
        );
    }
}

async fn spawn(contact: MockContactFeatureService, news: MockNewsFeatureService) -> SocketAddr {
    spawn_with_config(contact, news, RestServerConfig::default()).await
}

async fn spawn_with_config(
    contact: MockContactFeatureService,
    news: MockNewsFeatureService,
    config: RestServerConfig,
) -> SocketAddr {
    let router = RestServer::new(contact, news, config).router();
    counsel_testing::spawn(router).await.unwrap()
}

async fn allowed_origin(addr: SocketAddr, origin: &str) -> Option<String> {
    let response = reqwest::Client::new()
        .get(format!("http://{addr}/health"))
        .header("origin", origin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get("access-control-allow-origin")
        .map(|value| value.to_str().unwrap().to_owned())
}

async fn post_contact(addr: SocketAddr, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/contact"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

fn jane_doe() -> ContactFormInput {
    ContactFormInput {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@x.com".into(),
        phone: String::new(),
        legal_service: "Family Law".into(),
        message: "Help".into(),
    }
}

fn jane_doe_json() -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@x.com",
        "phone": "",
        "legalService": "Family Law",
        "message": "Help",
    })
}

fn slug() -> ArticleSlug {
    "welcome".try_into().unwrap()
}

fn article() -> Article {
    Article {
        id: "1".into(),
        slug: slug(),
        title: "Welcome".into(),
        excerpt: "Hello".into(),
        body_html: None,
        feature_image_url: None,
        published_at: "2024-01-08T04:00:00Z".parse().unwrap(),
        reading_time_minutes: Some(2),
        authors: vec![],
        tags: vec![],
    }
}
