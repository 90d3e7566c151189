//! Memory-match demo.
//!
//! Runs one real-time session with a bot that remembers every face it has
//! seen, and logs the game as it goes.
//!
//! Usage: `memory-match-demo [seed] [config.json]`

use rustc_hash::FxHashMap;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use memory_match::cues::{dispatch, Cue, CueSink};
use memory_match::driver::{spawn_session, SessionError, SessionHandle};
use memory_match::{Card, CardId, GameConfig, GameEvent, GameOutcome, GameState};

/// Logs cues instead of playing them.
struct LogCueSink;

impl CueSink for LogCueSink {
    fn play(&mut self, cue: Cue) {
        let tones: Vec<_> = cue.tones().iter().map(|t| t.frequency_hz).collect();
        info!(?cue, ?tones, "cue");
    }
}

/// Faces seen so far, by card.
#[derive(Default)]
struct Memory {
    faces: FxHashMap<CardId, String>,
}

impl Memory {
    fn observe(&mut self, state: &GameState) {
        for card in state.deck.iter().filter(|c| c.flipped) {
            self.faces.insert(card.id, card.face.clone());
        }
    }

    /// A hidden card we know shares `face`, other than `except`.
    fn known_partner(&self, state: &GameState, face: &str, except: CardId) -> Option<CardId> {
        state
            .deck
            .iter()
            .filter(|c| c.is_selectable() && c.id != except)
            .find(|c| self.faces.get(&c.id).map(String::as_str) == Some(face))
            .map(|c| c.id)
    }

    /// A hidden card we have never seen.
    fn unseen(&self, state: &GameState, except: Option<CardId>) -> Option<CardId> {
        let hidden: Vec<&Card> = state
            .deck
            .iter()
            .filter(|c| c.is_selectable() && Some(c.id) != except)
            .collect();
        hidden
            .iter()
            .find(|c| !self.faces.contains_key(&c.id))
            .or_else(|| hidden.first())
            .map(|c| c.id)
    }

    fn choose(&self, state: &GameState) -> Option<CardId> {
        if let [pending] = state.pending_selection() {
            let face = self.faces.get(pending)?;
            return self
                .known_partner(state, face, *pending)
                .or_else(|| self.unseen(state, Some(*pending)));
        }

        // A known pair among hidden cards
        for card in state.deck.iter().filter(|c| c.is_selectable()) {
            if let Some(face) = self.faces.get(&card.id) {
                if self.known_partner(state, face, card.id).is_some() {
                    return Some(card.id);
                }
            }
        }
        self.unseen(state, None)
    }
}

async fn play(session: &SessionHandle) -> Result<GameState, SessionError> {
    let mut watch = session.watch();
    let mut memory = Memory::default();

    loop {
        let state = watch.borrow_and_update().clone();
        if state.is_over() {
            return Ok(state);
        }
        memory.observe(&state);

        if !state.locked {
            if let Some(card) = memory.choose(&state) {
                session.select(card).await?;
            }
        }

        if watch.changed().await.is_err() {
            return Err(SessionError::Closed);
        }
    }
}

fn config_from_args() -> (u64, GameConfig) {
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);

    let config = match args.next() {
        Some(path) => GameConfig::load(&path).unwrap_or_else(|err| {
            warn!(%err, "falling back to the standard config");
            GameConfig::standard()
        }),
        None => GameConfig::standard(),
    };
    (seed, config)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (seed, config) = config_from_args();
    info!(seed, pairs = config.pair_count(), time = config.starting_time_secs, "starting demo");

    let session = spawn_session(config, seed);
    let mut events = session.subscribe();

    let cue_task = tokio::spawn(async move {
        let mut sink = LogCueSink;
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "cue listener fell behind");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            dispatch(&mut sink, [&event]);
            if let GameEvent::PairMatched { pair, score, .. } = event {
                info!(%pair, score, "pair found");
            }
        }
    });

    let result = play(&session).await;
    if let Err(err) = session.shutdown().await {
        warn!(%err, "session did not stop cleanly");
    }
    // Sender is gone once the session stops, which ends the cue task.
    let _ = cue_task.await;

    match result {
        Ok(state) => match state.outcome() {
            GameOutcome::Won => info!(score = state.score, time_left = state.time_left, "you win"),
            _ => info!(score = state.score, pairs = state.matched_pairs(), "time up"),
        },
        Err(err) => warn!(%err, "game interrupted"),
    }
}
