use std::{future::Future, time::Duration};

use counsel_models::contact::CrmItemId;
use serde_json::{Map, Value};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait CrmApiService: Send + Sync + 'static {
    /// Create an item on the configured CRM board and return its id.
    fn create_item(
        &self,
        item: CrmItem,
    ) -> impl Future<Output = Result<CrmItemId, CrmCreateItemError>> + Send;
}

/// A record to be created on the CRM board.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmItem {
    pub name: String,
    /// Column id -> column value, in the format the CRM expects for the
    /// respective column type.
    pub column_values: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum CrmCreateItemError {
    /// The CRM answered with an error list.
    #[error("CRM rejected the request: {0}")]
    Rejected(String),
    #[error("CRM response did not contain the id of the created item")]
    MissingItemId,
    #[error("CRM request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Failed to reach the CRM: {0:#}")]
    Network(anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CrmCreateItemError {
    /// Whether repeating the same request later might succeed.
    ///
    /// Only timeouts and connectivity problems qualify. Anything the CRM
    /// answered is final, so repeating it could create duplicate records.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }
}

#[cfg(feature = "mock")]
impl MockCrmApiService {
    pub fn with_create_item(
        mut self,
        item: CrmItem,
        result: Result<CrmItemId, CrmCreateItemError>,
    ) -> Self {
        self.expect_create_item()
            .once()
            .with(mockall::predicate::eq(item))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn transient() {
        assert!(CrmCreateItemError::Timeout(Duration::from_secs(10)).is_transient());
        assert!(CrmCreateItemError::Network(anyhow!("connection refused")).is_transient());

        assert!(!CrmCreateItemError::Rejected("invalid board".into()).is_transient());
        assert!(!CrmCreateItemError::MissingItemId.is_transient());
        assert!(!CrmCreateItemError::Other(anyhow!("network")).is_transient());
    }
}
