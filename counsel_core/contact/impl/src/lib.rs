use std::sync::Arc;

use counsel_core_contact_contracts::ContactFeatureService;
use counsel_extern_contracts::crm::CrmApiService;
use counsel_models::contact::{ContactFormInput, ContactSubmission, SubmissionResult};
use counsel_shared_contracts::time::TimeService;
use counsel_utils::retry::RetryPolicy;
use tracing::{debug, error, info, instrument, warn};

pub use crate::{
    fallback::FallbackEmail,
    form::{ContactForm, FormState, FormStatus},
    payload::CrmColumnMapping,
};

mod fallback;
mod form;
mod payload;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Time, Crm> {
    time: Time,
    crm: Crm,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Recipient of the fallback email draft.
    pub intake_email: Arc<str>,
    pub firm_name: Arc<str>,
    pub columns: CrmColumnMapping,
    /// Applies to timeouts and connectivity problems only.
    pub retry: RetryPolicy,
}

impl<Time, Crm> ContactFeatureServiceImpl<Time, Crm> {
    pub fn new(time: Time, crm: Crm, config: ContactFeatureConfig) -> Self {
        Self { time, crm, config }
    }
}

impl<Time, Crm> ContactFeatureService for ContactFeatureServiceImpl<Time, Crm>
where
    Time: TimeService,
    Crm: CrmApiService,
{
    #[instrument(skip_all)]
    async fn submit(&self, input: ContactFormInput) -> SubmissionResult {
        let submission = match input.validate() {
            Ok(submission) => submission,
            Err(field_errors) => {
                debug!(fields = ?field_errors.fields().collect::<Vec<_>>(), "invalid contact form");
                return SubmissionResult::ValidationError { field_errors };
            }
        };

        let item = payload::build_item(&submission, &self.config.columns);

        let mut retries = 0;
        loop {
            debug!(attempt = retries + 1, "submitting contact form to crm");
            let err = match self.crm.create_item(item.clone()).await {
                Ok(item_id) => {
                    info!(item_id = item_id.as_str(), "contact form submitted");
                    return SubmissionResult::Success { item_id };
                }
                Err(err) => err,
            };

            if !err.is_transient() {
                warn!(error = %err, "crm did not accept contact form, falling back to email");
                return self.fallback(&submission, &err.to_string());
            }

            retries += 1;
            let Some(delay) = self.config.retry.delay(retries) else {
                error!(error = %err, retries = retries - 1, "failed to reach crm, giving up");
                return SubmissionResult::NetworkError {
                    retries_left: self.config.retry.remaining(retries - 1),
                };
            };

            warn!(error = %err, retry = retries, ?delay, "failed to reach crm, retrying");
            tokio::time::sleep(delay).await;
        }
    }
}

impl<Time, Crm> ContactFeatureServiceImpl<Time, Crm>
where
    Time: TimeService,
{
    fn fallback(&self, submission: &ContactSubmission, reason: &str) -> SubmissionResult {
        let email = FallbackEmail::new(submission, &self.config.firm_name, reason, self.time.now());

        SubmissionResult::EmailFallback {
            mailto: email.mailto(&self.config.intake_email),
            reason: reason.into(),
        }
    }
}
