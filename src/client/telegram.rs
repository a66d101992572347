//! Telegram Bot API message sink.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::MessageSink;
use crate::config::NotifierConfig;
use crate::error::NotifierError;

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_thread_id: Option<i64>,
}

/// Envelope every Bot API response is wrapped in.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Delivers HTML messages to one chat (and optional forum topic).
#[derive(Debug, Clone)]
pub struct TelegramSink {
    http: Client,
    endpoint: String,
    chat_id: String,
    thread_id: Option<i64>,
}

impl TelegramSink {
    /// Builds the sink from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Request`] if the HTTP client cannot be built.
    pub fn new(config: &NotifierConfig) -> Result<Self, NotifierError> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.telegram_api_url, config.telegram_token
            ),
            chat_id: config.telegram_chat_id.clone(),
            thread_id: config.telegram_thread_id,
        })
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn send(&self, text: &str) -> Result<(), NotifierError> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
            message_thread_id: self.thread_id,
        };

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        // Telegram explains rejections (bad markup, unknown chat) in `description`.
        let parsed = response.json::<ApiResponse>().await.ok();
        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(NotifierError::Delivery(
                api.description.unwrap_or_else(|| format!("HTTP {status}")),
            )),
            None => Err(NotifierError::Delivery(format!("HTTP {status}"))),
        }
    }
}
