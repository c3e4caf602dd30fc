use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::form::ContactRequest;
use crate::config::ContactConfig;

pub const API_KEY_ENV: &str = "SENDGRID_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
}

impl Email {
    /// The notification sent to the site owner for one contact request.
    pub fn inquiry(config: &ContactConfig, request: &ContactRequest) -> Self {
        Self {
            to: config.recipient.clone(),
            from: config.sender.clone(),
            subject: config.subject.clone(),
            text: format!(
                "Name: {}\nEmail: {}\nMessage:\n{}\n",
                request.name, request.email, request.message
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Human-readable name of the mail provider
    fn name(&self) -> &'static str;

    async fn send(&self, email: &Email) -> Result<()>;
}

/// Transactional mail through the SendGrid v3 `mail/send` API.
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl SendGridMailer {
    pub fn new(api_key: String, url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            url,
        }
    }

    pub fn from_env(url: &str) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .with_context(|| format!("{} environment variable is required", API_KEY_ENV))?;
        Ok(Self::new(api_key, url.to_string()))
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    fn name(&self) -> &'static str {
        "sendgrid"
    }

    async fn send(&self, email: &Email) -> Result<()> {
        debug!("Sending mail to {} via SendGrid", email.to);

        let payload = json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": email.from },
            "subject": email.subject,
            "content": [{ "type": "text/plain", "value": email.text }],
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to reach SendGrid")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "SendGrid rejected mail with status {}: {}",
                status,
                body
            ));
        }

        Ok(())
    }
}
