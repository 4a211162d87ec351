use std::collections::BTreeMap;

use counsel_models::contact::{ContactFormInput, SubmissionResult};
use serde::{Deserialize, Deserializer, Serialize};

/// The contact form as submitted by the browser. Missing and `null` fields are
/// treated as empty so that they are reported as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiContactForm {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub legal_service: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl From<ApiContactForm> for ContactFormInput {
    fn from(value: ApiContactForm) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            legal_service: value.legal_service,
            message: value.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApiSubmissionResult {
    #[serde(rename_all = "camelCase")]
    Success { item_id: String },
    /// `mailto` should be opened by the browser to send the form by email
    /// instead.
    EmailFallback { mailto: String, reason: String },
    #[serde(rename_all = "camelCase")]
    ValidationError {
        field_errors: BTreeMap<&'static str, &'static str>,
    },
    #[serde(rename_all = "camelCase")]
    NetworkError { retries_left: u32 },
}

impl From<SubmissionResult> for ApiSubmissionResult {
    fn from(value: SubmissionResult) -> Self {
        match value {
            SubmissionResult::Success { item_id } => Self::Success {
                item_id: item_id.into_inner(),
            },
            SubmissionResult::EmailFallback { mailto, reason } => {
                Self::EmailFallback { mailto, reason }
            }
            SubmissionResult::ValidationError { field_errors } => Self::ValidationError {
                field_errors: field_errors
                    .iter()
                    .map(|(field, error)| (field.as_str(), error.message()))
                    .collect(),
            },
            SubmissionResult::NetworkError { retries_left } => Self::NetworkError { retries_left },
        }
    }
}

#[cfg(test)]
mod tests {
    use counsel_models::contact::{ContactField, FieldError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize_results() {
        for (result, expected) in [
            (
                SubmissionResult::Success {
                    item_id: "4711".try_into().unwrap(),
                },
                json!({"status": "success", "itemId": "4711"}),
            ),
            (
                SubmissionResult::EmailFallback {
                    mailto: "mailto:a@b.c".into(),
                    reason: "X".into(),
                },
                json!({"status": "email_fallback", "mailto": "mailto:a@b.c", "reason": "X"}),
            ),
            (
                SubmissionResult::ValidationError {
                    field_errors: [
                        (ContactField::FirstName, FieldError::Required),
                        (ContactField::Phone, FieldError::InvalidPhone),
                    ]
                    .into_iter()
                    .collect(),
                },
                json!({
                    "status": "validation_error",
                    "fieldErrors": {
                        "firstName": "This field is required",
                        "phone": "Please enter a valid phone number",
                    },
                }),
            ),
            (
                SubmissionResult::NetworkError { retries_left: 0 },
                json!({"status": "network_error", "retriesLeft": 0}),
            ),
        ] {
            let result = serde_json::to_value(ApiSubmissionResult::from(result)).unwrap();
            assert_eq!(result, expected);
        }
    }

    #[test]
    fn missing_fields_are_empty() {
        let form = serde_json::from_value::<ApiContactForm>(json!({"firstName": "Jane"})).unwrap();

        assert_eq!(
            ContactFormInput::from(form),
            ContactFormInput {
                first_name: "Jane".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn null_fields_are_empty() {
        let form = serde_json::from_value::<ApiContactForm>(
            json!({"firstName": "Jane", "phone": null, "message": null}),
        )
        .unwrap();

        assert_eq!(
            ContactFormInput::from(form),
            ContactFormInput {
                first_name: "Jane".into(),
                ..Default::default()
            }
        );
    }
}
