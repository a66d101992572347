//! Domain layer: board structure, card activities, watermark and messages.
//!
//! Everything here is pure data plus rendering; network and storage live in
//! [`crate::client`] and [`crate::persistence`].

pub mod activity;
pub mod board;
pub mod message;
pub mod watermark;

pub use activity::{Activity, ActivityKind};
pub use board::{Board, BoardList, Card};
pub use message::NotificationMessage;
pub use watermark::Watermark;
