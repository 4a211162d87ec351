use std::sync::atomic::{AtomicBool, Ordering};

use counsel_core_contact_contracts::ContactFeatureService;
use counsel_models::contact::{ContactField, ContactFormInput, FieldErrors, SubmissionResult};
use tokio::sync::Mutex;
use tracing::debug;

/// Client side state of the contact form.
///
/// Drives a single form through `Idle -> Submitting -> (Success |
/// ValidationError | EmailFallback | Error)`. Editing any field after a
/// submission finished returns the form to `Idle`, and only one submission
/// can be in flight at a time.
#[derive(Debug)]
pub struct ContactForm<Contact> {
    contact: Contact,
    submitting: AtomicBool,
    state: Mutex<FormState>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    ValidationError,
    EmailFallback,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub input: ContactFormInput,
    pub status: FormStatus,
    pub field_errors: FieldErrors,
    /// Number of failed submissions since the last success or manual retry.
    pub retry_count: u32,
    /// Email draft to open after the CRM rejected the last submission.
    pub mailto: Option<String>,
}

impl<Contact> ContactForm<Contact>
where
    Contact: ContactFeatureService,
{
    pub fn new(contact: Contact) -> Self {
        Self {
            contact,
            submitting: AtomicBool::new(false),
            state: Mutex::default(),
        }
    }

    pub async fn state(&self) -> FormState {
        self.state.lock().await.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub async fn set_field(&self, field: ContactField, value: impl Into<String>) {
        if self.is_submitting() {
            return;
        }

        let mut state = self.state.lock().await;
        state.input.set(field, value.into());
        state.field_errors.remove(field);
        if state.status != FormStatus::Idle {
            state.status = FormStatus::Idle;
            state.mailto = None;
        }
    }

    /// Submit the current input.
    ///
    /// Returns `None` without doing anything if another submission is still
    /// in flight.
    pub async fn submit(&self) -> Option<SubmissionResult> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;

        let input = {
            let mut state = self.state.lock().await;
            state.status = FormStatus::Submitting;
            state.field_errors = FieldErrors::default();
            state.mailto = None;
            state.input.clone()
        };

        let result = self.contact.submit(input).await;

        let mut state = self.state.lock().await;
        match &result {
            SubmissionResult::Success { .. } => {
                state.status = FormStatus::Success;
                state.input.clear();
                state.retry_count = 0;
            }
            SubmissionResult::EmailFallback { mailto, .. } => {
                state.status = FormStatus::EmailFallback;
                state.input.clear();
                state.mailto = Some(mailto.clone());
            }
            SubmissionResult::ValidationError { field_errors } => {
                state.status = FormStatus::ValidationError;
                state.field_errors = field_errors.clone();
            }
            SubmissionResult::NetworkError { .. } => {
                state.status = FormStatus::Error;
                state.retry_count += 1;
            }
        }
        debug!(status = ?state.status, retry_count = state.retry_count, "contact form submission finished");

        Some(result)
    }

    /// Submit again after a failed submission.
    ///
    /// Only possible in the `Error` state, returns `None` otherwise.
    pub async fn retry(&self) -> Option<SubmissionResult> {
        {
            let mut state = self.state.lock().await;
            if state.status != FormStatus::Error {
                return None;
            }
            state.retry_count = 0;
        }

        self.submit().await
    }
}

struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
