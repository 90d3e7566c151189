//! The memory-match engine.

use im::Vector;
use rand::seq::SliceRandom;
use rand::RngCore;
use rustc_hash::FxHashMap;
use tracing::{debug, info, trace};

use crate::core::{Card, CardId, GameConfig, GameRng, GameState};
use crate::schedule::{ScheduledTask, Scheduler, TaskKind};

use super::events::{GameEvent, IgnoreReason, SelectOutcome};

/// Memory-match game engine.
///
/// Owns the deck, counters, turn buffer and pending timers. It is driven by
/// three inputs:
/// - `select` from the player
/// - `tick` from a 1 s clock
/// - `advance` / `advance_to` moving the virtual millisecond clock that
///   deferred tasks (flip-back, delta clearing) are due on
///
/// All mutations for one input are applied before the call returns, so an
/// observer never sees a half-resolved turn.
///
/// ## Determinism
///
/// The deck is shuffled with `R`. With a seeded generator the whole game is
/// reproducible from the sequence of inputs.
pub struct MemoryGame<R: RngCore = GameRng> {
    config: GameConfig,
    state: GameState,
    scheduler: Scheduler,
    rng: R,

    /// Deck index of each card id, rebuilt on every deal.
    positions: FxHashMap<CardId, usize>,

    /// Virtual time in milliseconds. Monotonic across resets.
    now_ms: u64,

    /// Events not yet drained.
    events: Vec<GameEvent>,
}

impl MemoryGame<GameRng> {
    /// Create a game with an entropy-seeded deck.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, GameRng::from_entropy())
    }

    /// Create a game with a reproducible deck.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, GameRng::new(seed))
    }
}

impl<R: RngCore> MemoryGame<R> {
    /// Create a game shuffling with the given generator, and deal.
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let state = GameState::new(Vector::new(), config.starting_time_secs, Default::default());
        let mut game = Self {
            config,
            state,
            scheduler: Scheduler::new(),
            rng,
            positions: FxHashMap::default(),
            now_ms: 0,
            events: Vec::new(),
        };
        game.reset();
        game
    }

    // === Accessors ===

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state. O(1) for the deck.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Virtual clock in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// When the next deferred task is due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    /// Pending deferred tasks.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Take all events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Lifecycle ===

    /// Deal a fresh game with the configured faces and starting time.
    ///
    /// Supersedes everything: pending flip-backs and delta clears from the
    /// previous deal are dropped and can never fire.
    pub fn reset(&mut self) {
        let dropped = self.scheduler.advance_generation();
        if dropped > 0 {
            debug!(dropped, "dropped pending tasks on reset");
        }

        let mut cards: Vec<Card> = self
            .config
            .faces
            .iter()
            .zip(0u32..)
            .flat_map(|(face, index)| Card::pair(index, face))
            .collect();
        cards.shuffle(&mut self.rng);

        self.positions = cards.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        self.state = GameState::new(
            cards.into_iter().collect(),
            self.config.starting_time_secs,
            self.scheduler.generation(),
        );

        self.events.clear();
        self.events.push(GameEvent::Dealt {
            cards: self.state.card_count(),
        });

        info!(
            generation = %self.state.generation,
            cards = self.state.card_count(),
            time = self.state.time_left,
            "dealt new game"
        );
    }

    /// Reset with new faces and starting time. Later `reset` calls reuse them.
    ///
    /// An empty face list deals an empty deck, which is immediately won.
    pub fn reset_with<I, S>(&mut self, faces: I, starting_time_secs: u32)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.faces = faces.into_iter().map(Into::into).collect();
        self.config.starting_time_secs = starting_time_secs;
        self.reset();
    }

    // === Inputs ===

    /// Count down one second. No-op once the game is over.
    pub fn tick(&mut self) {
        if self.state.is_over() {
            trace!("tick after game over");
            return;
        }

        self.state.time_left = self.state.time_left.saturating_sub(1);
        self.note_if_over(false);
    }

    /// Turn a card face-up and resolve the turn if it is the second one.
    ///
    /// Ignored while locked, after the game is over, for unknown ids, and for
    /// cards already face-up or matched.
    pub fn select(&mut self, card_id: CardId) -> SelectOutcome {
        if let Some(reason) = self.rejection(card_id) {
            trace!(card = %card_id, ?reason, "selection ignored");
            return SelectOutcome::Ignored(reason);
        }

        self.set_flipped(card_id, true);
        self.state.turn.push(card_id);
        self.events.push(GameEvent::CardRevealed { card: card_id });
        debug!(card = %card_id, "revealed");

        if self.state.turn.len() < 2 {
            return SelectOutcome::Revealed;
        }
        let (first, second) = (self.state.turn[0], self.state.turn[1]);
        self.resolve(first, second)
    }

    /// Move the virtual clock forward by `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.advance_to(self.now_ms.saturating_add(elapsed_ms));
    }

    /// Move the virtual clock to `now_ms`, running due tasks in deadline order.
    ///
    /// Tasks scheduled by a firing task run in the same call if they are due.
    /// Moving backwards is ignored.
    pub fn advance_to(&mut self, now_ms: u64) {
        if now_ms < self.now_ms {
            return;
        }

        while let Some(task) = self.scheduler.pop_due(now_ms) {
            self.now_ms = self.now_ms.max(task.due_at_ms);
            self.run(task);
        }
        self.now_ms = now_ms;
    }

    // === Internals ===

    fn rejection(&self, card_id: CardId) -> Option<IgnoreReason> {
        if self.state.is_over() {
            return Some(IgnoreReason::GameOver);
        }
        if self.state.locked {
            return Some(IgnoreReason::Locked);
        }
        match self.card(card_id) {
            None => Some(IgnoreReason::UnknownCard),
            Some(card) if !card.is_selectable() => Some(IgnoreReason::AlreadyRevealed),
            Some(_) => None,
        }
    }

    fn resolve(&mut self, first: CardId, second: CardId) -> SelectOutcome {
        let pairs = (
            self.card(first).map(|c| c.pair_id),
            self.card(second).map(|c| c.pair_id),
        );

        match pairs {
            (Some(a), Some(b)) if a == b => {
                for id in [first, second] {
                    if let Some(card) = self.card_mut(id) {
                        card.matched = true;
                    }
                }

                let bonus = self.config.match_bonus;
                self.state.score = self.state.score.saturating_add(bonus);
                self.state.last_score_delta = i32::try_from(bonus).unwrap_or(i32::MAX);
                self.scheduler.replace(
                    self.now_ms,
                    self.config.delta_display_ms,
                    TaskKind::ClearScoreDelta,
                );
                self.state.turn.clear();

                self.events.push(GameEvent::PairMatched {
                    pair: a,
                    first,
                    second,
                    score: self.state.score,
                });
                debug!(pair = %a, score = self.state.score, "matched");

                self.note_if_over(false);
                SelectOutcome::Matched(a)
            }
            _ => {
                self.state.locked = true;
                self.scheduler.schedule(
                    self.now_ms,
                    self.config.flip_back_delay_ms,
                    TaskKind::FlipBack { first, second },
                );

                self.events.push(GameEvent::PairMismatched { first, second });
                debug!(first = %first, second = %second, "mismatched, locked");

                SelectOutcome::Mismatched
            }
        }
    }

    fn run(&mut self, task: ScheduledTask) {
        if !self.scheduler.is_current(&task) {
            trace!(task = %task.id, generation = %task.generation, "stale task skipped");
            return;
        }

        match task.kind {
            TaskKind::FlipBack { first, second } => self.flip_back(first, second),
            TaskKind::ClearScoreDelta => {
                self.state.last_score_delta = 0;
                self.events.push(GameEvent::ScoreDeltaCleared);
            }
            TaskKind::ClearTimeDelta => {
                self.state.last_time_delta = 0;
                self.events.push(GameEvent::TimeDeltaCleared);
            }
        }
    }

    fn flip_back(&mut self, first: CardId, second: CardId) {
        let was_over = self.state.is_over();

        self.set_flipped(first, false);
        self.set_flipped(second, false);

        let before = self.state.time_left;
        let after = before.saturating_sub(self.config.mismatch_penalty_secs);
        self.state.time_left = after;

        let delta = i64::from(after) - i64::from(before);
        self.state.last_time_delta = i32::try_from(delta).unwrap_or(i32::MIN);
        self.scheduler.replace(
            self.now_ms,
            self.config.delta_display_ms,
            TaskKind::ClearTimeDelta,
        );

        self.state.turn.clear();
        self.state.locked = false;

        self.events.push(GameEvent::FlippedBack {
            first,
            second,
            time_delta: self.state.last_time_delta,
        });
        debug!(first = %first, second = %second, time = after, delta, "flipped back, unlocked");

        self.note_if_over(was_over);
    }

    /// Record the transition into game over, once.
    fn note_if_over(&mut self, was_over: bool) {
        if was_over || !self.state.is_over() {
            return;
        }

        let event = if self.state.all_matched() {
            GameEvent::BoardCleared
        } else {
            GameEvent::TimeUp
        };
        info!(
            outcome = ?self.state.outcome(),
            score = self.state.score,
            time = self.state.time_left,
            "game over"
        );
        self.events.push(event);
    }

    fn card(&self, id: CardId) -> Option<&Card> {
        let index = *self.positions.get(&id)?;
        self.state.deck.get(index)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        let index = *self.positions.get(&id)?;
        self.state.deck.get_mut(index)
    }

    fn set_flipped(&mut self, id: CardId, flipped: bool) {
        if let Some(card) = self.card_mut(id) {
            if !card.matched {
                card.flipped = flipped;
            }
        }
    }
}

impl<R: RngCore> std::fmt::Debug for MemoryGame<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGame")
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}
