use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use counsel_extern_contracts::crm::{CrmApiService, CrmCreateItemError, CrmItem};
use counsel_models::contact::CrmItemId;
use counsel_utils::Apply;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::http::HttpClient;

/// https://developer.monday.com/api-reference/reference/items#create-an-item
const CREATE_ITEM_MUTATION: &str = "mutation ($boardId: ID!, $itemName: String!, $columnValues: JSON!) { create_item (board_id: $boardId, item_name: $itemName, column_values: $columnValues) { id } }";

#[derive(Debug, Clone)]
pub struct CrmApiServiceImpl {
    config: CrmApiServiceConfig,
    http: HttpClient,
}

#[derive(Debug, Clone)]
pub struct CrmApiServiceConfig {
    pub endpoint: Arc<Url>,
    pub api_token: Arc<str>,
    /// Sent as `API-Version` header unless empty.
    pub api_version: Arc<str>,
    pub board_id: Arc<str>,
    /// Upper bound for a whole request, including reading the response.
    pub timeout: Duration,
}

impl CrmApiServiceImpl {
    pub fn new(config: CrmApiServiceConfig) -> Self {
        Self {
            config,
            http: HttpClient::default(),
        }
    }

    async fn send(&self, request: &CreateItemRequest<'_>) -> Result<CrmItemId, CrmCreateItemError> {
        let response = self
            .http
            .post((*self.config.endpoint).clone())
            .header(AUTHORIZATION, &*self.config.api_token)
            .apply_if(!self.config.api_version.is_empty(), |req| {
                req.header("API-Version", &*self.config.api_version)
            })
            .json(request)
            .send()
            .await
            .map_err(|err| {
                CrmCreateItemError::Network(
                    anyhow!(err).context("Failed to send create item request"),
                )
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            CrmCreateItemError::Network(anyhow!(err).context("Failed to read create item response"))
        })?;
        debug!(%status, len = body.len(), "received create item response");

        let response = match serde_json::from_slice::<CreateItemResponse>(&body) {
            Ok(response) => response,
            Err(_) if status.is_server_error() => {
                return Err(CrmCreateItemError::Network(anyhow!(
                    "CRM responded with status {status}"
                )))
            }
            Err(err) => {
                return Err(anyhow!(err)
                    .context(format!(
                        "Failed to deserialize create item response (status {status})"
                    ))
                    .into())
            }
        };

        if let Some(message) = response.error_message() {
            return Err(CrmCreateItemError::Rejected(message));
        }

        if !status.is_success() {
            return Err(unexpected_status(status));
        }

        response
            .data
            .and_then(|data| data.create_item)
            .and_then(|item| CrmItemId::try_new(item.id).ok())
            .ok_or(CrmCreateItemError::MissingItemId)
    }
}

fn unexpected_status(status: StatusCode) -> CrmCreateItemError {
    let err = anyhow!("CRM responded with status {status}");
    if status.is_server_error() {
        CrmCreateItemError::Network(err)
    } else {
        CrmCreateItemError::Other(err)
    }
}

impl CrmApiService for CrmApiServiceImpl {
    #[instrument(skip_all, fields(item_name = %item.name))]
    async fn create_item(&self, item: CrmItem) -> Result<CrmItemId, CrmCreateItemError> {
        let column_values = serde_json::to_string(&item.column_values)
            .context("Failed to serialize column values")?;

        let request = CreateItemRequest {
            query: CREATE_ITEM_MUTATION,
            variables: CreateItemVariables {
                board_id: &self.config.board_id,
                item_name: &item.name,
                column_values,
            },
        };

        // dropping the request future on timeout aborts the request
        tokio::time::timeout(self.config.timeout, self.send(&request))
            .await
            .map_err(|_| CrmCreateItemError::Timeout(self.config.timeout))?
    }
}

#[derive(Serialize)]
struct CreateItemRequest<'a> {
    query: &'static str,
    variables: CreateItemVariables<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateItemVariables<'a> {
    board_id: &'a str,
    item_name: &'a str,
    /// The CRM expects the column values as a JSON encoded string.
    column_values: String,
}

#[derive(Deserialize)]
struct CreateItemResponse {
    data: Option<CreateItemData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
    error_message: Option<String>,
}

impl CreateItemResponse {
    fn error_message(&self) -> Option<String> {
        self.errors
            .first()
            .map(|err| err.message.clone())
            .or_else(|| self.error_message.clone())
    }
}

#[derive(Deserialize)]
struct CreateItemData {
    create_item: Option<CreatedItem>,
}

#[derive(Deserialize)]
struct CreatedItem {
    id: String,
}

#[derive(Deserialize)]
struct GraphqlError {
    #[serde(default = "unknown_error")]
    message: String,
}

fn unknown_error() -> String {
    "Unknown API error".into()
}
