//! Engine events.
//!
//! Every observable transition is recorded as a `GameEvent` so the
//! presentation layer can react (sound cues, animations) without diffing
//! snapshots.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PairId};

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A new deck was dealt.
    Dealt { cards: usize },

    /// A card was turned face-up by the player.
    CardRevealed { card: CardId },

    /// The two revealed cards were a pair.
    PairMatched {
        pair: PairId,
        first: CardId,
        second: CardId,
        score: u32,
    },

    /// The two revealed cards were not a pair; input is locked.
    PairMismatched { first: CardId, second: CardId },

    /// A mismatched pair turned face-down and the penalty was applied.
    FlippedBack {
        first: CardId,
        second: CardId,
        time_delta: i32,
    },

    /// `last_score_delta` returned to zero.
    ScoreDeltaCleared,

    /// `last_time_delta` returned to zero.
    TimeDeltaCleared,

    /// The countdown reached zero.
    TimeUp,

    /// Every pair was found.
    BoardCleared,
}

impl GameEvent {
    /// Does this event end the game?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::TimeUp | GameEvent::BoardCleared)
    }
}

/// Why a selection was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The game has ended.
    GameOver,
    /// A mismatch is waiting to flip back.
    Locked,
    /// No card with that id in the deck.
    UnknownCard,
    /// The card is already face-up or matched.
    AlreadyRevealed,
}

/// Result of a `select` call. Informational only; ignored calls change nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// Nothing happened.
    Ignored(IgnoreReason),
    /// First card of a turn is face-up.
    Revealed,
    /// Second card completed a pair.
    Matched(PairId),
    /// Second card did not match; flip-back is scheduled.
    Mismatched,
}

impl SelectOutcome {
    /// Did the call change state?
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, SelectOutcome::Ignored(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        assert!(GameEvent::TimeUp.is_terminal());
        assert!(GameEvent::BoardCleared.is_terminal());
        assert!(!GameEvent::CardRevealed { card: CardId::new(0) }.is_terminal());
    }

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::FlippedBack {
            first: CardId::new(1),
            second: CardId::new(4),
            time_delta: -5,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "flipped_back");
        assert_eq!(json["time_delta"], -5);

        let back: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_select_outcome() {
        assert!(SelectOutcome::Ignored(IgnoreReason::Locked).is_ignored());
        assert!(!SelectOutcome::Revealed.is_ignored());
    }
}
