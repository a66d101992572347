//! On-disk record for the watermark file.

use serde::{Deserialize, Serialize};

use crate::domain::Watermark;

/// Contents of the state file: `{"last_check": "<iso-8601>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkRecord {
    /// Last instant fully processed.
    pub last_check: Watermark,
}
