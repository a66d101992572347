//! JSON file implementation of the watermark store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use super::WatermarkStore;
use super::models::WatermarkRecord;
use crate::domain::Watermark;
use crate::error::NotifierError;

/// Watermark kept in a single JSON file.
///
/// Saves write a sibling `*.tmp` file, flush it to disk and rename it over
/// the target, so a crash leaves either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    path: PathBuf,
    lookback: Duration,
}

impl FileWatermarkStore {
    /// Creates a store at `path`; `lookback` sizes the default window.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, lookback: Duration) -> Self {
        Self {
            path: path.into(),
            lookback,
        }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<Watermark>, NotifierError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: WatermarkRecord = serde_json::from_slice(&bytes)
            .map_err(|e| NotifierError::Persistence(e.to_string()))?;

        DateTime::parse_from_rfc3339(record.last_check.as_str())
            .map_err(|e| NotifierError::Persistence(format!("invalid timestamp: {e}")))?;

        Ok(Some(record.last_check))
    }

    /// Writes `bytes` to `tmp`, flushes it and renames it over the target.
    async fn replace_with(&self, tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(tmp, &self.path).await
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl WatermarkStore for FileWatermarkStore {
    async fn load(&self) -> Watermark {
        match self.read().await {
            Ok(Some(watermark)) => watermark,
            Ok(None) => {
                let fallback = Watermark::default_for(Utc::now(), self.lookback);
                tracing::info!(path = %self.path.display(), %fallback, "no stored watermark");
                fallback
            }
            Err(e) => {
                let fallback = Watermark::default_for(Utc::now(), self.lookback);
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    %fallback,
                    "stored watermark unreadable, using default"
                );
                fallback
            }
        }
    }

    async fn save(&self, watermark: &Watermark) -> Result<(), NotifierError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let record = WatermarkRecord {
            last_check: watermark.clone(),
        };
        let json = serde_json::to_vec(&record)
            .map_err(|e| NotifierError::Persistence(e.to_string()))?;

        let tmp = self.temp_path();
        if let Err(e) = self.replace_with(&tmp, &json).await {
            match tokio::fs::remove_file(&tmp).await {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    tracing::warn!(path = %tmp.display(), error = %cleanup, "failed to remove temp file");
                }
                _ => {}
            }
            return Err(e.into());
        }
        tracing::debug!(path = %self.path.display(), %watermark, "watermark saved");
        Ok(())
    }
}
