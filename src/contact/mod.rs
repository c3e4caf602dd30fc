mod client;
mod form;
mod mailer;
mod mailto;
mod server;

pub use client::{ContactClient, SubmissionOutcome, SubmitState};
pub use form::{error_note, is_valid_email, ContactForm, ContactRequest, FieldError};
pub use mailer::{Email, Mailer, SendGridMailer, API_KEY_ENV};
pub use mailto::mailto_uri;
pub use server::{router, serve, AppState, CONTACT_PATH};

#[cfg(test)]
pub(crate) mod testing {
    use std::{net::SocketAddr, sync::Mutex};

    use anyhow::Result;
    use async_trait::async_trait;
    use axum::Router;

    use super::mailer::{Email, Mailer};

    /// Mailer double that records what it was asked to send.
    #[derive(Default)]
    pub struct RecordingMailer {
        fail: bool,
        sent: Mutex<Vec<Email>>,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn sent(&self) -> Vec<Email> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, email: &Email) -> Result<()> {
            if self.fail {
                return Err(anyhow::anyhow!("provider unavailable"));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    /// Serves `app` on an ephemeral loopback port.
    pub async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }
}
