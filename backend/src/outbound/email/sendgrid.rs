//! Reqwest-backed SendGrid mailer adapter.
//!
//! Implements the `Mailer` port against the SendGrid v3 mail send API.
//! SendGrid acknowledges accepted messages with `202 Accepted`; anything
//! else is a rejection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::domain::ports::{EmailMessage, Mailer, MailerError};

const SENDGRID_SEND_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Serialize)]
struct SendRequestDto<'a> {
    personalizations: [PersonalizationDto<'a>; 1],
    from: AddressDto<'a>,
    subject: &'a str,
    content: [ContentDto<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PersonalizationDto<'a> {
    to: [AddressDto<'a>; 1],
}

#[derive(Debug, Serialize)]
struct AddressDto<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ContentDto<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

/// Mailer adapter performing HTTP POST requests against SendGrid.
pub struct SendGridMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl SendGridMailer {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        api_key: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: SENDGRID_SEND_ENDPOINT.to_owned(),
            api_key: api_key.into(),
            from: from.into(),
        })
    }

    /// Override the send endpoint, for tests against a local server.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailerError> {
        let payload = SendRequestDto {
            personalizations: [PersonalizationDto {
                to: [AddressDto {
                    email: message.to.as_str(),
                }],
            }],
            from: AddressDto { email: &self.from },
            subject: &message.subject,
            content: [ContentDto {
                content_type: "text/html",
                value: &message.html_body,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| MailerError::transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(MailerError::rejected(format!(
            "provider returned {status}: {body}"
        )))
    }
}
