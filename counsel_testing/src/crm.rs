use std::{
    net::IpAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

pub const GRAPHQL_ROUTE: &str = "/v2";
pub const ITEMS_ROUTE: &str = "/items";

/// Item names containing this marker make the server hang.
pub const SLOW_MARKER: &str = "[slow]";
/// Item names containing this marker get a response without an item id.
pub const NO_ID_MARKER: &str = "[no-id]";
/// Item names containing this marker get a plain text 503 response.
pub const UNAVAILABLE_MARKER: &str = "[unavailable]";

#[derive(Debug, Clone)]
pub struct CrmTestConfig {
    pub api_token: String,
    pub board_id: String,
}

impl Default for CrmTestConfig {
    fn default() -> Self {
        Self {
            api_token: "test-token".into(),
            board_id: "1234567890".into(),
        }
    }
}

pub async fn start_server(host: IpAddr, port: u16, config: CrmTestConfig) -> anyhow::Result<()> {
    info!("Starting crm testing server on {host}:{port}");
    info!("GraphQL endpoint: http://{host}:{port}{GRAPHQL_ROUTE}");
    info!("Created items: http://{host}:{port}{ITEMS_ROUTE}");
    info!("API token: {:?}", config.api_token);
    info!("Board id: {:?}", config.board_id);
    info!(
        "Item names containing {SLOW_MARKER:?}, {NO_ID_MARKER:?} or {UNAVAILABLE_MARKER:?} \
         trigger the corresponding failure"
    );

    crate::serve(router(config), host, port).await
}

pub fn router(config: CrmTestConfig) -> Router {
    Router::new()
        .route(GRAPHQL_ROUTE, routing::post(graphql))
        .route(ITEMS_ROUTE, routing::get(list_items))
        .with_state(Arc::new(CrmState {
            config,
            items: Mutex::default(),
        }))
}

struct CrmState {
    config: CrmTestConfig,
    items: Mutex<Vec<StoredItem>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub column_values: Map<String, Value>,
}

#[derive(Deserialize)]
struct GraphqlRequest {
    variables: CreateItemVariables,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateItemVariables {
    board_id: String,
    item_name: String,
    column_values: String,
}

async fn graphql(
    State(state): State<Arc<CrmState>>,
    headers: HeaderMap,
    Json(GraphqlRequest { variables }): Json<GraphqlRequest>,
) -> Response {
    let authorized = headers
        .get(AUTHORIZATION)
        .is_some_and(|token| token.as_bytes() == state.config.api_token.as_bytes());
    if !authorized {
        return (StatusCode::UNAUTHORIZED, graphql_error("Not Authenticated")).into_response();
    }

    if variables.board_id != state.config.board_id {
        return graphql_error("Board not found").into_response();
    }

    let Ok(column_values) = serde_json::from_str::<Map<String, Value>>(&variables.column_values)
    else {
        return graphql_error("Invalid column values").into_response();
    };

    if variables.item_name.contains(SLOW_MARKER) {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }

    if variables.item_name.contains(UNAVAILABLE_MARKER) {
        return (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response();
    }

    if variables.item_name.contains(NO_ID_MARKER) {
        return Json(json!({"data": {"create_item": null}})).into_response();
    }

    let mut items = state.items.lock().unwrap();
    let id = (items.len() + 1).to_string();
    items.push(StoredItem {
        id: id.clone(),
        board_id: variables.board_id,
        name: variables.item_name,
        column_values,
    });

    Json(json!({"data": {"create_item": {"id": id}}})).into_response()
}

async fn list_items(State(state): State<Arc<CrmState>>) -> Json<Vec<StoredItem>> {
    Json(state.items.lock().unwrap().clone())
}

fn graphql_error(message: &str) -> Json<Value> {
    Json(json!({"errors": [{"message": message}]}))
}
