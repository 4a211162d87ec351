use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use counsel_core_contact_contracts::ContactFeatureService;
use counsel_models::contact::SubmissionResult;

use super::error;
use crate::models::contact::{ApiContactForm, ApiSubmissionResult};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactFeatureService>>,
    form: Result<Json<ApiContactForm>, JsonRejection>,
) -> Response {
    let Json(form) = match form {
        Ok(form) => form,
        Err(rejection) => return error(rejection.status(), "Invalid contact form"),
    };

    let result = service.submit(form.into()).await;

    let status = match result {
        SubmissionResult::Success { .. } | SubmissionResult::EmailFallback { .. } => StatusCode::OK,
        SubmissionResult::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionResult::NetworkError { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(ApiSubmissionResult::from(result))).into_response()
}
