//! Shared fixtures for in-crate tests.

#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::MessageSink;
use crate::config::NotifierConfig;
use crate::domain::Watermark;
use crate::error::NotifierError;
use crate::persistence::WatermarkStore;

/// Configuration pointing both upstream services at local mock servers.
pub(crate) fn test_config(board_uri: &str, telegram_uri: &str) -> NotifierConfig {
    let result = NotifierConfig::from_lookup(|key| match key {
        "BASE_URL" => Some(board_uri.to_string()),
        "KANBN_API_KEY" => Some("test-key".to_string()),
        "BOARD_ID" => Some("b1".to_string()),
        "TELEGRAM_TOKEN" => Some("123:abc".to_string()),
        "TELEGRAM_CHAT_ID" => Some("-1001".to_string()),
        "TELEGRAM_API_URL" => Some(telegram_uri.to_string()),
        "HTTP_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    });
    match result {
        Ok(config) => config,
        Err(e) => panic!("test config should load: {e}"),
    }
}

/// Sink that records every message and can be told to reject some.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
    reject_containing: Option<String>,
}

impl RecordingSink {
    /// Rejects any message containing `needle`.
    pub(crate) fn rejecting(needle: &str) -> Self {
        Self {
            sent: Arc::default(),
            reject_containing: Some(needle.to_string()),
        }
    }

    /// Messages accepted so far.
    pub(crate) fn sent(&self) -> Vec<String> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(_) => panic!("sink mutex poisoned"),
        }
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, text: &str) -> Result<(), NotifierError> {
        if self
            .reject_containing
            .as_deref()
            .is_some_and(|needle| text.contains(needle))
        {
            return Err(NotifierError::Delivery("rejected by test sink".to_string()));
        }
        match self.sent.lock() {
            Ok(mut sent) => sent.push(text.to_string()),
            Err(_) => panic!("sink mutex poisoned"),
        }
        Ok(())
    }
}

/// Store that always loads a fixed watermark and refuses every save.
#[derive(Debug)]
pub(crate) struct FailingStore {
    watermark: Watermark,
    save_attempts: AtomicUsize,
}

impl FailingStore {
    pub(crate) fn new(watermark: Watermark) -> Self {
        Self {
            watermark,
            save_attempts: AtomicUsize::new(0),
        }
    }

    /// Number of rejected saves so far.
    pub(crate) fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WatermarkStore for FailingStore {
    async fn load(&self) -> Watermark {
        self.watermark.clone()
    }

    async fn save(&self, _watermark: &Watermark) -> Result<(), NotifierError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifierError::Persistence("disk full".to_string()))
    }
}
