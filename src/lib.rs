//! # kanbn-notifier
//!
//! Watches a Kan.bn board and forwards new card activity to a Telegram chat.
//!
//! Each cycle loads the stored watermark, fetches the board and every
//! card's activity history, renders activities newer than the watermark
//! into HTML messages, reduces them to the Telegram markup subset and sends
//! them. The watermark then advances to the instant the cycle started.
//!
//! ## Architecture
//!
//! ```text
//! Poller (service/)
//!     │
//!     └── ActivityScanner (service/)
//!             │
//!             ├── WatermarkStore (persistence/)  load / save
//!             ├── BoardClient (client/)          Kan.bn REST API
//!             ├── NotificationMessage (domain/)  render
//!             ├── sanitize (markup/)             HTML allow-list
//!             └── MessageSink (client/)          Telegram Bot API
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod markup;
pub mod persistence;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;
