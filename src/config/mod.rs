use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::media::DEFAULT_BASE_URL;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `json`, or anything else for human-readable output.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    /// Page location relative media references are resolved against.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ContactConfig {
    /// Inbox that receives contact mail.
    pub recipient: String,
    /// Verified sender address at the mail provider.
    pub sender: String,
    pub subject: String,
    /// Where the submission client posts the form.
    pub endpoint: String,
    pub fallback_address: String,
    pub fallback_subject: String,
    pub fallback_delay_ms: u64,
    pub sendgrid_url: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "hello@example.com".to_string(),
            sender: "noreply@example.com".to_string(),
            subject: "New Inquiry from Portfolio Website".to_string(),
            endpoint: "http://localhost:3000/api/contact".to_string(),
            fallback_address: "hello@example.com".to_string(),
            fallback_subject: "Inquiry".to_string(),
            fallback_delay_ms: 700,
            sendgrid_url: "https://api.sendgrid.com/v3/mail/send".to_string(),
        }
    }
}

impl ContactConfig {
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.get_logging_format(), "json");
        assert_eq!(config.site.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.contact.fallback_delay(), Duration::from_millis(700));
        assert_eq!(config.contact.subject, "New Inquiry from Portfolio Website");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
[logging]
format = "pretty"

[contact]
recipient = "me@example.org"
fallback_delay_ms = 0
"#,
        );

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.get_logging_format(), "pretty");
        assert_eq!(config.contact.recipient, "me@example.org");
        assert_eq!(config.contact.fallback_delay(), Duration::ZERO);
        assert_eq!(config.contact.sender, "noreply@example.com");
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let file = write_config("[logging\nformat = ");
        assert!(Config::from_file(file.path().to_str().unwrap()).is_err());
        assert!(Config::from_file("/nonexistent/reelbox.toml").is_err());
    }
}
