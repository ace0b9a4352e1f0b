//! Contact form submission and newsletter signup.
//!
//! Delivery is still a stub: a submission that passes validation is logged,
//! counted, and acknowledged after a fixed delay standing in for the real
//! transport.

use std::time::Duration;

use bytes::Bytes;
use metrics::counter;
use tracing::{info, warn};

use crate::domain::attachments::{AttachmentPreview, AttachmentRejection, screen_attachment};
use crate::domain::contact::{ContactSubmission, FieldError, field_spec, validate_field,
    validate_submission};

pub const METRIC_CONTACT_SUBMISSIONS: &str = "vetrina_contact_submissions_total";
pub const METRIC_ATTACHMENTS_REJECTED: &str = "vetrina_attachments_rejected_total";
pub const METRIC_NEWSLETTER_SIGNUPS: &str = "vetrina_newsletter_signups_total";

/// One uploaded file as it arrives from the multipart body.
#[derive(Debug, Clone)]
pub struct IncomingAttachment {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// What the submit handler renders: inline field errors, or an acceptance
/// with the per-file screening results.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Invalid(Vec<FieldError>),
    Accepted {
        previews: Vec<AttachmentPreview>,
        rejections: Vec<AttachmentRejection>,
    },
}

#[derive(Clone)]
pub struct ContactService {
    submit_delay: Duration,
    newsletter_delay: Duration,
    max_attachment_bytes: u64,
}

impl ContactService {
    pub fn new(
        submit_delay: Duration,
        newsletter_delay: Duration,
        max_attachment_bytes: u64,
    ) -> Self {
        Self {
            submit_delay,
            newsletter_delay,
            max_attachment_bytes,
        }
    }

    /// Validate one field, as the blur handler does.
    pub fn check_field(&self, field: &str, value: &str) -> Option<FieldError> {
        field_spec(field).and_then(|spec| validate_field(spec, value))
    }

    /// Validate and accept a full submission. Field errors stop the
    /// submission; attachment rejections only drop the offending file.
    pub async fn submit(
        &self,
        submission: &ContactSubmission,
        attachments: &[IncomingAttachment],
    ) -> SubmissionOutcome {
        let errors = validate_submission(submission);
        if !errors.is_empty() {
            return SubmissionOutcome::Invalid(errors);
        }

        let mut previews = Vec::new();
        let mut rejections = Vec::new();
        for attachment in attachments {
            match screen_attachment(
                &attachment.name,
                &attachment.content_type,
                attachment.bytes.len() as u64,
                self.max_attachment_bytes,
            ) {
                Ok(()) => previews.push(AttachmentPreview::new(
                    &attachment.name,
                    &attachment.content_type,
                    attachment.bytes.len() as u64,
                )),
                Err(rejection) => {
                    counter!(METRIC_ATTACHMENTS_REJECTED).increment(1);
                    warn!(
                        target = "vetrina::contact",
                        file = %attachment.name,
                        "attachment rejected: {rejection}"
                    );
                    rejections.push(rejection);
                }
            }
        }

        // Stands in for mail transport latency until delivery exists.
        tokio::time::sleep(self.submit_delay).await;

        counter!(METRIC_CONTACT_SUBMISSIONS).increment(1);
        info!(
            target = "vetrina::contact",
            service = %submission.service,
            attachments = previews.len(),
            "contact submission accepted"
        );

        SubmissionOutcome::Accepted {
            previews,
            rejections,
        }
    }

    /// Newsletter signup: a bare email check, then the same stubbed delay.
    pub async fn subscribe(&self, email: &str) -> Result<(), FieldError> {
        if let Some(spec) = field_spec("email")
            && let Some(error) = validate_field(spec, email)
        {
            return Err(error);
        }

        tokio::time::sleep(self.newsletter_delay).await;

        counter!(METRIC_NEWSLETTER_SIGNUPS).increment(1);
        info!(target = "vetrina::contact", "newsletter signup accepted");
        Ok(())
    }
}
