use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

use super::{
    form::{error_note, ContactForm, ContactRequest, FieldError},
    mailto::mailto_uri,
};
use crate::config::ContactConfig;

pub const SENT_NOTE: &str = "Message sent \u{2014} thank you!";
pub const NETWORK_NOTE: &str =
    "Network error \u{2014} opening your mail client as a fallback.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    /// Request in flight; the submit button is disabled and busy.
    Sending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Blocked before any request was made.
    Invalid {
        note: String,
        errors: Vec<FieldError>,
    },
    Sent {
        note: String,
    },
    /// The API path failed; `mailto` is the draft to open instead.
    Fallback {
        note: String,
        mailto: String,
    },
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Submits the contact form to the site's API, degrading to a `mailto:`
/// draft on any transport or server failure.
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: String,
    fallback_address: String,
    fallback_subject: String,
    fallback_delay: Duration,
    state: SubmitState,
}

impl ContactClient {
    pub fn new(config: &ContactConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            fallback_address: config.fallback_address.clone(),
            fallback_subject: config.fallback_subject.clone(),
            fallback_delay: config.fallback_delay(),
            state: SubmitState::Idle,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub async fn submit(&mut self, form: &ContactForm) -> SubmissionOutcome {
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                return SubmissionOutcome::Invalid {
                    note: error_note(&errors),
                    errors,
                }
            }
        };

        self.state = SubmitState::Sending;
        let outcome = self.post(&request).await;
        self.state = SubmitState::Idle;

        outcome
    }

    async fn post(&self, request: &ContactRequest) -> SubmissionOutcome {
        info!("Submitting contact form to {}", self.endpoint);

        match self.http.post(&self.endpoint).json(request).send().await {
            Ok(response) if response.status().is_success() => SubmissionOutcome::Sent {
                note: SENT_NOTE.to_string(),
            },
            Ok(response) => {
                let status = response.status();
                let server_error = response
                    .json::<ErrorBody>()
                    .await
                    .ok()
                    .and_then(|body| body.error);
                warn!("Contact API returned {}: {:?}", status, server_error);

                let note = match server_error {
                    Some(e) => format!(
                        "Failed to send message. {} Opening your mail client as a fallback...",
                        e
                    ),
                    None => {
                        "Failed to send message. Opening your mail client as a fallback..."
                            .to_string()
                    }
                };
                self.fallback(note, request).await
            }
            Err(e) => {
                error!("Contact API error: {}", e);
                self.fallback(NETWORK_NOTE.to_string(), request).await
            }
        }
    }

    async fn fallback(&self, note: String, request: &ContactRequest) -> SubmissionOutcome {
        // Leave the note on screen briefly before the mail client takes over.
        tokio::time::sleep(self.fallback_delay).await;

        let mailto = mailto_uri(&self.fallback_address, &self.fallback_subject, request);
        info!("Falling back to mail client draft");
        SubmissionOutcome::Fallback { note, mailto }
    }
}
