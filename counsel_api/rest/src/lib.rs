use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    Router,
};
use counsel_core_contact_contracts::ContactFeatureService;
use counsel_core_news_contracts::NewsFeatureService;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact, News> {
    contact: Contact,
    news: News,
    config: RestServerConfig,
}

#[derive(Debug, Clone, Default)]
pub struct RestServerConfig {
    /// Origins allowed to make cross origin requests. Empty allows any
    /// origin.
    pub allowed_origins: Vec<HeaderValue>,
}

impl<Contact, News> RestServer<Contact, News>
where
    Contact: ContactFeatureService,
    News: NewsFeatureService,
{
    pub fn new(contact: Contact, news: News, config: RestServerConfig) -> Self {
        Self {
            contact,
            news,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        info!("Listening on {host}:{port}");
        axum::serve(listener, router).await.map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        let cors = cors(&self.config);

        let router = Router::new()
            .merge(routes::health::router())
            .merge(routes::contact::router(Arc::new(self.contact)))
            .merge(routes::news::router(Arc::new(self.news)))
            .layer(cors);

        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

fn cors(config: &RestServerConfig) -> CorsLayer {
    let origin = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.allowed_origins.iter().cloned())
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(middlewares::request_id::HEADER)])
}
