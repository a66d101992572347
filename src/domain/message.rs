//! Notification text rendered from a card activity.

use std::fmt;

use super::activity::{Activity, ActivityKind};
use super::board::Card;
use crate::config::card_url;
use crate::error::NotifierError;
use crate::markup::{escape_attr, escape_text, sanitize};

/// Shown when the board API omits the acting user.
const UNKNOWN_USER: &str = "unknown user";

/// A rendered notification. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    text: String,
}

impl NotificationMessage {
    /// Renders the message for `activity` on `card`.
    ///
    /// Plain-text values (title, names, type tag) are escaped; description
    /// and comment bodies are forwarded as markup and left to
    /// [`NotificationMessage::sanitized`].
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::MissingField`] when a known activity type
    /// lacks its payload.
    pub fn render(card: &Card, activity: &Activity, base_url: &str) -> Result<Self, NotifierError> {
        let link = format!(
            "<a href=\"{}\">{}</a>",
            escape_attr(&card_url(base_url, &card.public_id)),
            escape_text(&card.title)
        );

        let body = match activity.kind()? {
            ActivityKind::CardCreated => format!(
                "🆕 New task: {link}\nDescription:\n{}",
                card.description.as_deref().unwrap_or_default()
            ),
            ActivityKind::LabelAdded { label } => format!(
                "🔄 Task updated: {link}\n\nLabel added: <b>{}</b>",
                escape_text(&label)
            ),
            ActivityKind::CommentAdded { comment } => {
                format!("💬 Comment added: {link}\n\n{comment}")
            }
            ActivityKind::ListMoved { from, to } => format!(
                "🔀 Task moved: {link}\n\n<b>{} ⇒ {}</b>",
                escape_text(&from),
                escape_text(&to)
            ),
            ActivityKind::MemberAdded { member } => format!(
                "🐸 Task assignment: {link}\n\nAssigned to <b>{}</b>",
                escape_text(&member)
            ),
            ActivityKind::AttachmentAdded => format!("📎 Attachment added: {link}"),
            ActivityKind::Other(tag) => format!("🤔 {}: {link}", escape_text(&tag)),
        };

        let user = escape_text(activity.user_name().unwrap_or(UNKNOWN_USER));
        Ok(Self {
            text: format!("Update from {user}\n{body}"),
        })
    }

    /// Returns the rendered text before sanitizing.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the text reduced to the sink's markup subset.
    #[must_use]
    pub fn sanitized(&self) -> String {
        sanitize(&self.text)
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
