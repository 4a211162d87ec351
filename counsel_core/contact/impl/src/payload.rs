use std::sync::Arc;

use counsel_extern_contracts::crm::CrmItem;
use counsel_models::contact::ContactSubmission;
use serde_json::{json, Map, Value};

/// Ids of the CRM board columns the form fields are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmColumnMapping {
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    pub email: Arc<str>,
    pub phone: Arc<str>,
    pub legal_service: Arc<str>,
    pub message: Arc<str>,
}

impl Default for CrmColumnMapping {
    fn default() -> Self {
        Self {
            first_name: "text".into(),
            last_name: "text_mkv9gdmd".into(),
            email: "email".into(),
            phone: "text5".into(),
            legal_service: "dropdown_mkv9sy3b".into(),
            message: "long_text".into(),
        }
    }
}

pub fn item_name(submission: &ContactSubmission) -> String {
    format!(
        "{} - {}",
        submission.full_name(),
        submission.legal_service.label()
    )
}

/// Build the CRM record for a submission.
///
/// Email columns take an object with the address and its display text,
/// dropdown columns a list of labels. A missing phone number is left out.
pub fn build_item(submission: &ContactSubmission, columns: &CrmColumnMapping) -> CrmItem {
    let mut values = Map::new();
    let mut put = |column: &Arc<str>, value: Value| {
        values.insert(column.to_string(), value);
    };

    put(&columns.first_name, json!(*submission.first_name));
    put(&columns.last_name, json!(*submission.last_name));
    put(
        &columns.email,
        json!({"email": *submission.email, "text": *submission.email}),
    );
    if let Some(phone) = &submission.phone {
        put(&columns.phone, json!(**phone));
    }
    put(
        &columns.legal_service,
        json!({"labels": [submission.legal_service.label()]}),
    );
    put(&columns.message, json!(*submission.message));

    CrmItem {
        name: item_name(submission),
        column_values: values,
    }
}
