//! In-process watermark store.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::WatermarkStore;
use crate::domain::Watermark;
use crate::error::NotifierError;

/// Keeps the watermark in memory; lost on restart.
///
/// The binary always uses [`super::FileWatermarkStore`]. This one backs
/// tests and embedders that persist progress elsewhere.
#[derive(Debug, Default)]
pub struct MemoryWatermarkStore {
    value: Mutex<Option<Watermark>>,
    lookback: Duration,
}

impl MemoryWatermarkStore {
    /// Creates an empty store whose default is `now - lookback`.
    #[must_use]
    pub fn new(lookback: Duration) -> Self {
        Self {
            value: Mutex::new(None),
            lookback,
        }
    }

    /// Creates a store that already holds `watermark`.
    #[must_use]
    pub fn with_value(watermark: Watermark) -> Self {
        Self {
            value: Mutex::new(Some(watermark)),
            lookback: Duration::from_secs(3600),
        }
    }

    /// Returns the stored value, if any save happened.
    #[must_use]
    pub fn current(&self) -> Option<Watermark> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WatermarkStore for MemoryWatermarkStore {
    async fn load(&self) -> Watermark {
        self.current()
            .unwrap_or_else(|| Watermark::default_for(Utc::now(), self.lookback))
    }

    async fn save(&self, watermark: &Watermark) -> Result<(), NotifierError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(watermark.clone());
        Ok(())
    }
}
