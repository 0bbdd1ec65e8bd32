use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EmailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outbound email delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

/// Builds the verification email carrying `code`.
pub fn otp_email(to: &str, code: &str, ttl_minutes: i64) -> EmailMessage {
    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 480px; margin: 0 auto;">
  <h2>Welcome to ChefsCircle</h2>
  <p>Use the code below to verify your email address:</p>
  <p style="font-size: 32px; font-weight: bold; letter-spacing: 8px;">{code}</p>
  <p>This code expires in {ttl_minutes} minutes.</p>
  <p>If you did not request this code, you can ignore this email.</p>
</div>"#
    );
    EmailMessage {
        to: to.to_string(),
        subject: "Your ChefsCircle verification code".into(),
        html,
    }
}

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Delivers through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_url: &str, api_key: &str, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let payload = ResendPayload {
            from: &self.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
        };
        let res = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("resend request")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("resend rejected email: {status}: {body}");
        }
        debug!(to = %message.to, "email accepted by resend");
        Ok(())
    }
}

/// Local dev mailer: logs the message instead of sending it.
#[derive(Clone, Debug)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        info!(to = %message.to, subject = %message.subject, html = %message.html, "email send stub");
        Ok(())
    }
}

pub fn from_config(config: &EmailConfig) -> std::sync::Arc<dyn Mailer> {
    match &config.api_key {
        Some(key) => std::sync::Arc::new(ResendMailer::new(&config.api_url, key, &config.from)),
        None => {
            info!("RESEND_API_KEY not set; emails will be logged");
            std::sync::Arc::new(LogMailer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn otp_email_contains_code_and_validity() {
        let msg = otp_email("a@b.com", "482913", 10);
        assert_eq!(msg.to, "a@b.com");
        assert!(msg.html.contains("482913"));
        assert!(msg.html.contains("10 minutes"));
    }

    #[tokio::test]
    async fn resend_mailer_posts_bearer_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test"))
            .and(body_partial_json(serde_json::json!({
                "from": "ChefsCircle <noreply@test.dev>",
                "to": ["a@b.com"],
                "subject": "Your ChefsCircle verification code",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "e1"})))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = ResendMailer::new(&server.uri(), "re_test", "ChefsCircle <noreply@test.dev>");
        mailer
            .send(&otp_email("a@b.com", "123456", 10))
            .await
            .expect("send should succeed");
    }

    #[tokio::test]
    async fn resend_mailer_fails_on_provider_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid `to` field"))
            .mount(&server)
            .await;

        let mailer = ResendMailer::new(&server.uri(), "re_test", "noreply@test.dev");
        let err = mailer
            .send(&otp_email("not-an-email", "123456", 10))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("invalid `to` field"));
    }
}
