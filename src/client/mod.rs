//! Outbound HTTP: the board API we read and the chat we write to.

pub mod board;
pub mod telegram;

use async_trait::async_trait;

use crate::error::NotifierError;

pub use board::BoardClient;
pub use telegram::TelegramSink;

/// Destination for rendered notifications.
///
/// One call per qualifying activity. Implementations must not retry on
/// their own; the scanner decides what a failure means for the cycle.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Delivers one sanitized message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when the destination rejects the
    /// message, or [`NotifierError::Request`] on transport failure.
    async fn send(&self, text: &str) -> Result<(), NotifierError>;
}
