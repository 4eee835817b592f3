//! MailClient - posts composed emails to an HTTP mail relay.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::error::DeliveryError;
use super::request::{compose, DeliveryRequest};
use crate::config::MailConfig;
use crate::messages::{Locale, Message};
use crate::store::unix_millis;

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const HTTP_STATUS_BAD_REQUEST: u16 = 400;
const HTTP_STATUS_UNAUTHORIZED: u16 = 401;
const HTTP_STATUS_FORBIDDEN: u16 = 403;
const HTTP_STATUS_PAYLOAD_TOO_LARGE: u16 = 413;
const HTTP_STATUS_UNPROCESSABLE: u16 = 422;

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    attachments: Vec<Attachment<'a>>,
}

#[derive(Debug, Serialize)]
struct Attachment<'a> {
    filename: &'a str,
    content_type: &'a str,
    content_base64: String,
}

/// Relay acknowledgement. Only the id is of interest, for logging.
#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Result of a delivery attempt as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub message: String,
}

impl DeliveryOutcome {
    pub fn sent(locale: Locale) -> Self {
        Self {
            success: true,
            message: Message::DeliverySent.text(locale),
        }
    }

    pub fn failed(error: &DeliveryError, locale: Locale) -> Self {
        Self {
            success: false,
            message: error.user_message().text(locale),
        }
    }
}

/// Client for a JSON mail relay (`POST {api_url}/send`).
pub struct MailClient {
    api_key: String,
    base_url: String,
    from: String,
    http_client: reqwest::Client,
}

impl MailClient {
    /// Create a client from the `[mail]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::MissingCredentials` if the API key or sender
    /// address is not configured.
    pub fn from_config(config: &MailConfig) -> Result<Self, DeliveryError> {
        let api_key = config.api_key.clone().unwrap_or_default();
        let from = config.from.clone().unwrap_or_default();
        Self::with_base_url(api_key, from, config.api_url.clone())
    }

    /// Create a client against an explicit relay URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(
        api_key: String,
        from: String,
        base_url: String,
    ) -> Result<Self, DeliveryError> {
        if api_key.trim().is_empty() || from.trim().is_empty() {
            return Err(DeliveryError::MissingCredentials);
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            from,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    /// Send one email with the PNG attached.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Authentication` for 401/403,
    /// `DeliveryError::PayloadRejected` for 400/413/422,
    /// `DeliveryError::Connectivity` when the relay cannot be reached,
    /// or `DeliveryError::Api` for any other non-success status.
    pub async fn send(
        &self,
        request: &DeliveryRequest,
        locale: Locale,
        download_url: Option<&str>,
    ) -> Result<(), DeliveryError> {
        let content = compose(request, locale, download_url, unix_millis());
        let url = format!("{}/send", self.base_url);

        let body = SendRequest {
            from: &self.from,
            to: request.email(),
            subject: &content.subject,
            html: &content.html,
            attachments: vec![Attachment {
                filename: &content.attachment_filename,
                content_type: "image/png",
                content_base64: BASE64.encode(request.png()),
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(match code {
                HTTP_STATUS_UNAUTHORIZED | HTTP_STATUS_FORBIDDEN => {
                    log::warn!("Mail relay rejected credentials: {}", status);
                    DeliveryError::Authentication { status: code }
                }
                HTTP_STATUS_BAD_REQUEST | HTTP_STATUS_PAYLOAD_TOO_LARGE | HTTP_STATUS_UNPROCESSABLE => {
                    log::warn!("Mail relay rejected payload: {} {}", status, error_text);
                    DeliveryError::PayloadRejected {
                        status: code,
                        body: error_text,
                    }
                }
                _ => DeliveryError::Api {
                    status: code,
                    body: error_text,
                },
            });
        }

        // Some relays answer with an empty body.
        let ack: Option<SendResponse> = response.json().await.ok();
        log::info!(
            "Sent ASCII art to {} (id: {})",
            request.email(),
            ack.and_then(|a| a.id).unwrap_or_else(|| "-".to_string())
        );
        Ok(())
    }

    /// Send and fold the result into a localized outcome.
    pub async fn deliver(
        &self,
        request: &DeliveryRequest,
        locale: Locale,
        download_url: Option<&str>,
    ) -> DeliveryOutcome {
        match self.send(request, locale, download_url).await {
            Ok(()) => DeliveryOutcome::sent(locale),
            Err(e) => {
                log::error!("Email delivery failed: {}", e);
                DeliveryOutcome::failed(&e, locale)
            }
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> DeliveryError {
    if e.is_connect() || e.is_timeout() {
        log::warn!("Mail relay unreachable: {}", e);
        DeliveryError::Connectivity(e.to_string())
    } else {
        DeliveryError::Http(e)
    }
}
