//! Persistence layer: the single stored watermark.
//!
//! [`WatermarkStore`] is the seam between the scanner and durable storage.
//! [`FileWatermarkStore`] keeps the value in a small JSON file replaced
//! atomically on every save; [`MemoryWatermarkStore`] keeps it in process.

pub mod file;
pub mod memory;
pub mod models;

use async_trait::async_trait;

use crate::domain::Watermark;
use crate::error::NotifierError;

pub use file::FileWatermarkStore;
pub use memory::MemoryWatermarkStore;

/// Storage for the processed-up-to timestamp.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Returns the stored watermark, or `now - lookback` when nothing
    /// usable is stored. Never fails.
    async fn load(&self) -> Watermark;

    /// Overwrites the stored watermark in full.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Persistence`] if the value cannot be written.
    async fn save(&self, watermark: &Watermark) -> Result<(), NotifierError>;
}
