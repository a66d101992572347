//! Board structure as returned by `GET /boards/{boardId}`.

use serde::Deserialize;

/// A board: ordered lists of cards. Read-only to this crate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Board {
    /// Lists in board order.
    #[serde(default)]
    pub lists: Vec<BoardList>,
}

/// One column of the board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardList {
    /// Cards in list order.
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// A task card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Public identifier used in API paths and deep links.
    pub public_id: String,
    /// Card title (plain text).
    #[serde(default)]
    pub title: String,
    /// Card description (rich text, may contain HTML).
    #[serde(default)]
    pub description: Option<String>,
}

impl Board {
    /// Flattens all cards, list order first, then card order within a list.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.lists.iter().flat_map(|list| list.cards.iter())
    }
}
