use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::widget::{error::WidgetError, widget_model::TestimonialSubmission};

/// Host-supplied destination for finished testimonials.
///
/// A returned error is shown to the visitor as a retryable failure on the
/// review step; it never propagates into the host page.
pub trait Submitter {
    fn submit(&mut self, submission: &TestimonialSubmission) -> Result<(), WidgetError>;
}

impl<F> Submitter for F
where
    F: FnMut(&TestimonialSubmission) -> Result<(), WidgetError>,
{
    fn submit(&mut self, submission: &TestimonialSubmission) -> Result<(), WidgetError> {
        self(submission)
    }
}

// ============================================================================
// Webhook submitter
// ============================================================================

/// POSTs each submission as JSON to an HTTP endpoint.
pub struct WebhookSubmitter {
    pub endpoint: String,
    client: reqwest::blocking::Client,
}

impl WebhookSubmitter {
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self {
            endpoint: endpoint.to_string(),
            client,
        }
    }
}

impl Submitter for WebhookSubmitter {
    fn submit(&mut self, submission: &TestimonialSubmission) -> Result<(), WidgetError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .map_err(|source| WidgetError::Http {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(WidgetError::SubmitRejected {
            status: status.as_u16(),
            body,
        })
    }
}

// ============================================================================
// Recording submitter
// ============================================================================

/// Keeps submissions in memory. Used by the simulator and in tests.
///
/// Clones share the same log, so a clone can be handed to the widget while
/// the caller keeps one to inspect.
#[derive(Debug, Clone, Default)]
pub struct RecordingSubmitter {
    log: Rc<RefCell<Vec<TestimonialSubmission>>>,
    failures: Rc<RefCell<Vec<String>>>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next submit call fail with `reason`. Queued failures are
    /// consumed one per call.
    pub fn fail_next(&self, reason: &str) {
        self.failures.borrow_mut().push(reason.to_string());
    }

    pub fn submissions(&self) -> Vec<TestimonialSubmission> {
        self.log.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }
}

impl Submitter for RecordingSubmitter {
    fn submit(&mut self, submission: &TestimonialSubmission) -> Result<(), WidgetError> {
        let failure = {
            let mut failures = self.failures.borrow_mut();
            if failures.is_empty() {
                None
            } else {
                Some(failures.remove(0))
            }
        };

        if let Some(reason) = failure {
            return Err(WidgetError::Submit(reason));
        }

        self.log.borrow_mut().push(submission.clone());
        Ok(())
    }
}
