//! Card activity records and their typed view.
//!
//! The upstream `type` tag is open-ended: new values appear as the board
//! API grows (`card.updated.description`, `card.updated.member.removed`, ...).
//! [`ActivityKind`] therefore always has an [`ActivityKind::Other`] arm and
//! decoding never fails on an unknown tag.

use serde::Deserialize;

use crate::error::NotifierError;

/// Activity type tags with a dedicated template.
pub mod tags {
    /// Card was created.
    pub const CARD_CREATED: &str = "card.created";
    /// Label attached to the card.
    pub const LABEL_ADDED: &str = "card.updated.label.added";
    /// Comment posted on the card.
    pub const COMMENT_ADDED: &str = "card.updated.comment.added";
    /// Card moved between lists.
    pub const LIST_MOVED: &str = "card.updated.list";
    /// Member assigned to the card.
    pub const MEMBER_ADDED: &str = "card.updated.member.added";
    /// File attached to the card.
    pub const ATTACHMENT_ADDED: &str = "card.updated.attachment.added";
}

/// One entry of `GET /cards/{publicId}/activities`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Raw type tag.
    #[serde(rename = "type")]
    pub activity_type: String,
    /// ISO-8601 creation timestamp, compared against the watermark as-is.
    pub created_at: String,
    /// Acting user.
    #[serde(default)]
    pub user: Option<NamedRef>,
    #[serde(default)]
    label: Option<NamedRef>,
    #[serde(default)]
    comment: Option<CommentRef>,
    #[serde(default)]
    from_list: Option<NamedRef>,
    #[serde(default)]
    to_list: Option<NamedRef>,
    #[serde(default)]
    member: Option<MemberRef>,
}

/// Any upstream object that carries a display name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommentRef {
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MemberRef {
    #[serde(default)]
    user: Option<NamedRef>,
}

/// Typed view of an activity, carrying only what its template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    /// `card.created`
    CardCreated,
    /// `card.updated.label.added`
    LabelAdded {
        /// Label name.
        label: String,
    },
    /// `card.updated.comment.added`
    CommentAdded {
        /// Comment body (rich text).
        comment: String,
    },
    /// `card.updated.list`
    ListMoved {
        /// Source list name.
        from: String,
        /// Destination list name.
        to: String,
    },
    /// `card.updated.member.added`
    MemberAdded {
        /// Assignee display name.
        member: String,
    },
    /// `card.updated.attachment.added`
    AttachmentAdded,
    /// Any tag without a dedicated template.
    Other(String),
}

impl Activity {
    /// Decodes one raw activity object.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::MalformedActivity`] if `type` or `createdAt`
    /// is missing or not a string.
    pub fn from_value(value: serde_json::Value) -> Result<Self, NotifierError> {
        serde_json::from_value(value).map_err(|e| NotifierError::MalformedActivity(e.to_string()))
    }

    /// Display name of the acting user, if the API supplied one.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.name.as_deref())
    }

    /// Resolves the typed view of this activity.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::MissingField`] when a known type lacks the
    /// payload its template needs. Unknown types never fail.
    pub fn kind(&self) -> Result<ActivityKind, NotifierError> {
        let kind = match self.activity_type.as_str() {
            tags::CARD_CREATED => ActivityKind::CardCreated,
            tags::LABEL_ADDED => ActivityKind::LabelAdded {
                label: self.required(named(self.label.as_ref()), "label.name")?,
            },
            tags::COMMENT_ADDED => ActivityKind::CommentAdded {
                comment: self.required(
                    self.comment.as_ref().and_then(|c| c.comment.as_deref()),
                    "comment.comment",
                )?,
            },
            tags::LIST_MOVED => ActivityKind::ListMoved {
                from: self.required(named(self.from_list.as_ref()), "fromList.name")?,
                to: self.required(named(self.to_list.as_ref()), "toList.name")?,
            },
            tags::MEMBER_ADDED => ActivityKind::MemberAdded {
                member: self.required(
                    self.member
                        .as_ref()
                        .and_then(|m| named(m.user.as_ref())),
                    "member.user.name",
                )?,
            },
            tags::ATTACHMENT_ADDED => ActivityKind::AttachmentAdded,
            other => ActivityKind::Other(other.to_string()),
        };
        Ok(kind)
    }

    fn required(&self, value: Option<&str>, field: &'static str) -> Result<String, NotifierError> {
        value
            .map(str::to_string)
            .ok_or_else(|| NotifierError::MissingField {
                activity_type: self.activity_type.clone(),
                field,
            })
    }
}

fn named(r: Option<&NamedRef>) -> Option<&str> {
    r.and_then(|r| r.name.as_deref())
}
