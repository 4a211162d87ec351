use chrono::{DateTime, Utc};
use counsel_models::contact::ContactSubmission;

/// Email draft handed to the user when the CRM did not accept a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEmail {
    pub subject: String,
    pub body: String,
}

impl FallbackEmail {
    pub fn new(
        submission: &ContactSubmission,
        firm_name: &str,
        reason: &str,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let phone = submission.phone.as_deref().map_or("Not provided", String::as_str);

        let body = format!(
            "New Contact Form Submission from {firm_name} Website:\n\
             \n\
             Contact Information:\n\
             Name: {name}\n\
             Email: {email}\n\
             Phone: {phone}\n\
             \n\
             Legal Service Requested: {service}\n\
             \n\
             Client Message:\n\
             {message}\n\
             \n\
             Additional Information:\n\
             - Submission Date: {date}\n\
             - Source: Website Contact Form\n\
             - CRM Integration: Failed (using email fallback)\n\
             - Error: {reason}\n\
             \n\
             Please follow up with this client within 24 hours.",
            name = submission.full_name(),
            email = *submission.email,
            service = submission.legal_service,
            message = *submission.message,
            date = submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );

        Self {
            subject: format!(
                "URGENT: New Legal Consultation Request - {}",
                submission.full_name()
            ),
            body,
        }
    }

    /// `mailto:` uri with the percent encoded subject and body.
    pub fn mailto(&self, recipient: &str) -> String {
        format!(
            "mailto:{recipient}?subject={}&body={}",
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}
