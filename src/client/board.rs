//! Kan.bn board API client.
//!
//! Two read-only endpoints are used:
//!
//! - `GET {api}/boards/{boardId}`: lists and their cards
//! - `GET {api}/cards/{publicId}/activities`: a card's activity history
//!
//! Every request carries the `x-api-key` header and the configured timeout.

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::NotifierConfig;
use crate::domain::Board;
use crate::error::NotifierError;

/// HTTP client for the board API.
#[derive(Debug, Clone)]
pub struct BoardClient {
    http: Client,
    api_base: String,
}

impl BoardClient {
    /// Builds a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::InvalidConfig`] if the API key is not a
    /// valid header value, or [`NotifierError::Request`] if the TLS backend
    /// fails to initialise.
    pub fn new(config: &NotifierConfig) -> Result<Self, NotifierError> {
        let key = HeaderValue::from_str(&config.api_key).map_err(|_| NotifierError::InvalidConfig {
            key: "KANBN_API_KEY",
            value: "<redacted>".to_string(),
        })?;
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key);

        let http = Client::builder()
            .timeout(config.http_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base_url(),
        })
    }

    /// Fetches the board with all lists and cards.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::HttpStatus`] on a non-success status and
    /// [`NotifierError::Request`] on transport failure, timeout or an
    /// undecodable body.
    pub async fn fetch_board(&self, board_id: &str) -> Result<Board, NotifierError> {
        let url = format!("{}/boards/{board_id}", self.api_base);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::HttpStatus { status, url });
        }

        Ok(response.json::<Board>().await?)
    }

    /// Fetches the raw activity objects of one card.
    ///
    /// Returns `None` when the call fails or the body has no `activities`
    /// array; the caller skips that card. Individual entries are left
    /// undecoded so one bad record cannot hide its siblings.
    pub async fn fetch_activities(&self, public_id: &str) -> Option<Vec<serde_json::Value>> {
        let url = format!("{}/cards/{public_id}/activities", self.api_base);

        let response = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(card = public_id, error = %e, "activity fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(card = public_id, %status, "activity fetch returned non-success");
            return None;
        }

        let body = match response.json::<serde_json::Value>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(card = public_id, error = %e, "activity body is not JSON");
                return None;
            }
        };

        match body {
            serde_json::Value::Object(mut map) => match map.remove("activities") {
                Some(serde_json::Value::Array(items)) => Some(items),
                _ => {
                    tracing::warn!(card = public_id, "activity body has no activities array");
                    None
                }
            },
            _ => {
                tracing::warn!(card = public_id, "activity body is not an object");
                None
            }
        }
    }
}
