use std::future::Future;

use counsel_models::contact::{ContactFormInput, SubmissionResult};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validate the form and forward it to the CRM.
    ///
    /// Every failure is reported through the returned [`SubmissionResult`].
    fn submit(&self, input: ContactFormInput) -> impl Future<Output = SubmissionResult> + Send;
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(mut self, input: ContactFormInput, result: SubmissionResult) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(input))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
