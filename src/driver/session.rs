//! Real-time session: owns one engine and drives it from tokio timers.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::{CardId, GameConfig, GameState};
use crate::engine::{GameEvent, MemoryGame};

/// Queued commands per session.
const COMMAND_CAPACITY: usize = 64;

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 256;

/// Far enough away to never fire during a game.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Input to a running session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Player picked a card.
    Select(CardId),
    /// Deal a new game.
    Reset,
    /// Stop the session.
    Shutdown,
}

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session has stopped")]
    Closed,

    #[error("session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Handle to a running session.
///
/// Dropping the handle closes the command channel, which stops the session.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<GameState>,
    events: broadcast::Sender<GameEvent>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Forward a card selection.
    pub async fn select(&self, card: CardId) -> Result<(), SessionError> {
        self.send(Command::Select(card)).await
    }

    /// Deal a new game.
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.send(Command::Reset).await
    }

    /// Send a raw command.
    pub async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Latest published state.
    #[must_use]
    pub fn current(&self) -> GameState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<GameState> {
        self.state.clone()
    }

    /// Receive engine events from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Stop the session and wait for it to finish.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        // Already stopped is fine; the join below reports panics.
        let _ = self.commands.send(Command::Shutdown).await;
        self.task.await?;
        Ok(())
    }
}

/// Start a session with a seeded deck. Must be called inside a tokio runtime.
pub fn spawn_session(config: GameConfig, seed: u64) -> SessionHandle {
    spawn_with_game(MemoryGame::with_seed(config, seed))
}

/// Start a session around an existing engine.
pub fn spawn_with_game(mut game: MemoryGame) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
    let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

    // The initial deal is visible through the state channel.
    game.drain_events();
    let (state_tx, state_rx) = watch::channel(game.snapshot());

    let task = tokio::spawn(run_session(game, command_rx, state_tx, event_tx.clone()));

    SessionHandle {
        commands: command_tx,
        state: state_rx,
        events: event_tx,
        task,
    }
}

fn countdown(period: Duration) -> Interval {
    let mut clock = interval_at(Instant::now() + period, period);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    clock
}

async fn run_session(
    mut game: MemoryGame,
    mut commands: mpsc::Receiver<Command>,
    state_tx: watch::Sender<GameState>,
    event_tx: broadcast::Sender<GameEvent>,
) {
    // Engine time at `start`; the engine may have been advanced before spawning.
    let start = Instant::now();
    let base_ms = game.now_ms();
    let period = Duration::from_millis(game.config().tick_interval_ms.max(1));
    let mut clock = countdown(period);

    info!(generation = %game.state().generation, "session started");

    loop {
        let deadline = game.next_deadline();
        let wake_at = deadline
            .map(|ms| start + Duration::from_millis(ms.saturating_sub(base_ms)))
            .unwrap_or_else(|| Instant::now() + IDLE_WAIT);
        let running = !game.state().is_over();

        tokio::select! {
            _ = clock.tick(), if running => {
                game.advance_to(engine_now(start, base_ms));
                game.tick();
            }
            _ = sleep_until(wake_at), if deadline.is_some() => {
                game.advance_to(engine_now(start, base_ms));
            }
            command = commands.recv() => {
                game.advance_to(engine_now(start, base_ms));
                match command {
                    Some(Command::Select(card)) => {
                        let outcome = game.select(card);
                        debug!(card = %card, ?outcome, "select");
                    }
                    Some(Command::Reset) => {
                        game.reset();
                        clock = countdown(period);
                    }
                    Some(Command::Shutdown) | None => break,
                }
            }
        }

        for event in game.drain_events() {
            if event.is_terminal() {
                info!(?event, "countdown stopped");
            }
            // No subscribers is not an error.
            let _ = event_tx.send(event);
        }
        state_tx.send_replace(game.snapshot());
    }

    info!(
        outcome = ?game.state().outcome(),
        score = game.state().score,
        "session stopped"
    );
}

/// Engine clock reading for the current wall time.
fn engine_now(start: Instant, base_ms: u64) -> u64 {
    let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    base_ms.saturating_add(elapsed)
}
