use axum::{routing, Json, Router};

pub fn router() -> Router<()> {
    Router::new().route("/health", routing::get(health))
}

async fn health() -> Json<bool> {
    Json(true)
}
