//! Cards and their identifiers.
//!
//! A `Card` is one physical card on the table. Two cards share a `PairId`
//! and a face; the engine matches on the pair id, never on the face.

use serde::{Deserialize, Serialize};

/// Card identifier, unique within one deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identifier shared by exactly two cards of a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairId(pub u32);

impl PairId {
    /// Create a new pair ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pair({})", self.0)
    }
}

/// A card on the table.
///
/// `matched` implies `flipped`, and once set it never reverts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique id within the deck.
    pub id: CardId,

    /// Shared with the one other card this card matches.
    pub pair_id: PairId,

    /// Symbol shown when face-up. Opaque to the engine.
    pub face: String,

    /// Face-up, either pending in the current turn or matched.
    pub flipped: bool,

    /// Pair confirmed.
    pub matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    pub fn new(id: CardId, pair_id: PairId, face: impl Into<String>) -> Self {
        Self {
            id,
            pair_id,
            face: face.into(),
            flipped: false,
            matched: false,
        }
    }

    /// Build the two cards for the `index`-th face.
    ///
    /// Ids are `2 * index` and `2 * index + 1`; the pair id is `index`.
    #[must_use]
    pub fn pair(index: u32, face: &str) -> [Card; 2] {
        let pair_id = PairId::new(index);
        [
            Card::new(CardId::new(index * 2), pair_id, face),
            Card::new(CardId::new(index * 2 + 1), pair_id, face),
        ]
    }

    /// Can this card be picked by the player?
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.flipped && !self.matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{}", id), "Card(7)");
    }

    #[test]
    fn test_pair_id() {
        let id = PairId::new(3);
        assert_eq!(id.raw(), 3);
        assert_eq!(format!("{}", id), "Pair(3)");
    }

    #[test]
    fn test_pair_construction() {
        let [a, b] = Card::pair(2, "star");

        assert_eq!(a.id, CardId::new(4));
        assert_eq!(b.id, CardId::new(5));
        assert_eq!(a.pair_id, b.pair_id);
        assert_eq!(a.face, "star");
        assert!(a.is_selectable());
        assert!(!b.flipped && !b.matched);
    }

    #[test]
    fn test_selectable() {
        let mut card = Card::new(CardId::new(0), PairId::new(0), "x");
        assert!(card.is_selectable());

        card.flipped = true;
        assert!(!card.is_selectable());

        card.matched = true;
        assert!(!card.is_selectable());
    }
}
