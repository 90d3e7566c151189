//! Game state: the single observable value the engine mutates.
//!
//! ## GameState
//!
//! Everything the engine knows lives here:
//! - Deck (layout order, flip/match flags)
//! - Counters (score, time left)
//! - Turn buffer and lock
//! - Transient deltas for the presentation layer
//! - Generation of the current deal
//!
//! The deck uses an `im` persistent vector so snapshots published after every
//! change clone in O(1).

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardId, PairId};
use super::error::SnapshotError;
use crate::schedule::Generation;

/// Cards picked during the current unresolved turn (at most two).
pub type TurnBuffer = SmallVec<[CardId; 2]>;

/// How a game ended, or that it has not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Cards remain and time remains.
    InProgress,
    /// Every card matched. Takes precedence over `TimeUp`.
    Won,
    /// The countdown reached zero first.
    TimeUp,
}

/// Complete engine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Cards in layout order.
    pub deck: Vector<Card>,

    /// Points scored this game.
    pub score: u32,

    /// Seconds remaining. Never negative.
    pub time_left: u32,

    /// Set while a mismatch is waiting to flip back; selections are rejected.
    pub locked: bool,

    /// Most recent score change, cleared after the display window.
    pub last_score_delta: i32,

    /// Most recent time change actually applied, cleared after the display window.
    pub last_time_delta: i32,

    /// Deal this state belongs to.
    pub generation: Generation,

    /// Selections of the unresolved turn.
    pub(crate) turn: TurnBuffer,
}

impl GameState {
    /// Create a state around a freshly dealt deck.
    #[must_use]
    pub fn new(deck: Vector<Card>, starting_time: u32, generation: Generation) -> Self {
        Self {
            deck,
            score: 0,
            time_left: starting_time,
            locked: false,
            last_score_delta: 0,
            last_time_delta: 0,
            generation,
            turn: TurnBuffer::new(),
        }
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.iter().find(|c| c.id == id)
    }

    /// Cards selected in the unresolved turn.
    #[must_use]
    pub fn pending_selection(&self) -> &[CardId] {
        &self.turn
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len()
    }

    /// Number of pairs found so far.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.deck.iter().filter(|c| c.matched).count() / 2
    }

    /// Every card matched. Vacuously true for an empty deck.
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.deck.iter().all(|c| c.matched)
    }

    /// The game is over when time runs out or the board is cleared.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.time_left == 0 || self.all_matched()
    }

    /// Classify the current state.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        if self.all_matched() {
            GameOutcome::Won
        } else if self.time_left == 0 {
            GameOutcome::TimeUp
        } else {
            GameOutcome::InProgress
        }
    }

    /// Ids of both cards of a pair.
    pub fn pair_members(&self, pair: PairId) -> impl Iterator<Item = CardId> + '_ {
        self.deck.iter().filter(move |c| c.pair_id == pair).map(|c| c.id)
    }

    /// Encode for transport.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a snapshot produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
