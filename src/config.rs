//! Notifier configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Values are read once at startup and
//! never re-read.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::NotifierError;

/// Default Telegram Bot API endpoint.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Top-level notifier configuration.
///
/// Loaded once at startup via [`NotifierConfig::from_env`] and passed by
/// reference to the components that need it.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Public base URL of the Kan.bn instance, always ending in `/`.
    pub base_url: String,

    /// API key sent as `x-api-key` on every board request.
    pub api_key: String,

    /// Workspace the board belongs to. Only used for log context.
    pub workspace_id: Option<String>,

    /// Public identifier of the board to watch.
    pub board_id: String,

    /// Telegram bot token.
    pub telegram_token: String,

    /// Destination chat (numeric id or `@channel`).
    pub telegram_chat_id: String,

    /// Forum topic inside the destination chat.
    pub telegram_thread_id: Option<i64>,

    /// Telegram Bot API base URL.
    pub telegram_api_url: String,

    /// Path of the watermark state file.
    pub state_file: PathBuf,

    /// Idle delay between two cycles.
    pub poll_interval: Duration,

    /// Per-request timeout applied to both upstream services.
    pub http_timeout: Duration,

    /// How far back the first cycle looks when no watermark is stored.
    pub initial_lookback: Duration,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl NotifierConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::MissingConfig`] if a required variable is
    /// absent and [`NotifierError::InvalidConfig`] if `TELEGRAM_THREAD_ID`
    /// is not an integer.
    pub fn from_env() -> Result<Self, NotifierError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`NotifierConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(NotifierError::MissingConfig(key));

        let mut base_url = require("BASE_URL")?;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let api_key = require("KANBN_API_KEY")?;
        let board_id = require("BOARD_ID")?;
        let telegram_token = require("TELEGRAM_TOKEN")?;
        let telegram_chat_id = require("TELEGRAM_CHAT_ID")?;

        let telegram_thread_id = match get("TELEGRAM_THREAD_ID") {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| NotifierError::InvalidConfig {
                key: "TELEGRAM_THREAD_ID",
                value: raw,
            })?),
            None => None,
        };

        let telegram_api_url = get("TELEGRAM_API_URL")
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let state_file = get("STATE_FILE")
            .map_or_else(|| PathBuf::from("db").join("bot_state.json"), PathBuf::from);

        let poll_interval = Duration::from_secs(parse_env(get("POLL_INTERVAL_SECS"), 60));
        let http_timeout = Duration::from_secs(parse_env(get("HTTP_TIMEOUT_SECS"), 30));
        let initial_lookback = Duration::from_secs(parse_env(get("INITIAL_LOOKBACK_SECS"), 3600));

        let json_logs = get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        Ok(Self {
            base_url,
            api_key,
            workspace_id: get("WORKSPACE_ID"),
            board_id,
            telegram_token,
            telegram_chat_id,
            telegram_thread_id,
            telegram_api_url,
            state_file,
            poll_interval,
            http_timeout,
            initial_lookback,
            json_logs,
        })
    }

    /// Base URL of the board REST API (`{BASE_URL}api/v1`).
    #[must_use]
    pub fn api_base_url(&self) -> String {
        format!("{}api/v1", self.base_url)
    }

    /// Deep link to a card in the web UI.
    #[must_use]
    pub fn card_url(&self, public_id: &str) -> String {
        card_url(&self.base_url, public_id)
    }
}

/// Builds `{base_url}cards/{public_id}`; `base_url` must end with `/`.
#[must_use]
pub fn card_url(base_url: &str, public_id: &str) -> String {
    format!("{base_url}cards/{public_id}")
}

/// Parses an optional raw value as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}
