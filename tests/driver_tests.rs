//! Real-time session tests.
//!
//! Run on a paused tokio clock, so timer-driven transitions happen at exact
//! virtual instants.

use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::sleep;

use memory_match::driver::{spawn_session, spawn_with_game, Command, SessionHandle};
use memory_match::{CardId, GameConfig, GameEvent, GameOutcome, GameState, MemoryGame};

fn config() -> GameConfig {
    GameConfig::with_faces(["a", "b", "c", "d"])
}

/// Two cards from different pairs.
fn mismatched(state: &GameState) -> (CardId, CardId) {
    let first = &state.deck[0];
    let second = state
        .deck
        .iter()
        .find(|c| c.pair_id != first.pair_id)
        .expect("deck has more than one pair");
    (first.id, second.id)
}

/// Both cards of the first card's pair.
fn matching(state: &GameState) -> (CardId, CardId) {
    let first = &state.deck[0];
    let second = state
        .deck
        .iter()
        .find(|c| c.pair_id == first.pair_id && c.id != first.id)
        .expect("pair partner");
    (first.id, second.id)
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<GameEvent>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
    events
}

async fn settle() {
    sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_initial_state_published() {
    let session = spawn_session(config(), 1);
    let state = session.current();

    assert_eq!(state.card_count(), 8);
    assert_eq!(state.time_left, 60);
    assert_eq!(state.outcome(), GameOutcome::InProgress);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_countdown_ticks_every_second() {
    let session = spawn_session(config(), 2);

    sleep(Duration::from_millis(3500)).await;
    assert_eq!(session.current().time_left, 57);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_mismatch_flips_back_after_delay() {
    let session = spawn_session(config(), 3);
    let (a, b) = mismatched(&session.current());

    session.select(a).await.unwrap();
    session.select(b).await.unwrap();

    sleep(Duration::from_millis(100)).await;
    let locked = session.current();
    assert!(locked.locked);
    assert!(locked.card(a).unwrap().flipped);

    sleep(Duration::from_millis(750)).await; // t = 850
    let after = session.current();
    assert!(!after.locked);
    assert!(!after.card(a).unwrap().flipped);
    assert!(!after.card(b).unwrap().flipped);
    assert_eq!(after.time_left, 55);
    assert_eq!(after.last_time_delta, -5);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_match_scores_and_broadcasts() {
    let session = spawn_session(config(), 4);
    let mut events = session.subscribe();
    let (a, b) = matching(&session.current());

    session.select(a).await.unwrap();
    session.select(b).await.unwrap();
    settle().await;

    let state = session.current();
    assert_eq!(state.score, 10);
    assert_eq!(state.last_score_delta, 10);

    let received = drain(&mut events);
    assert_eq!(
        received,
        vec![
            GameEvent::CardRevealed { card: a },
            GameEvent::CardRevealed { card: b },
            GameEvent::PairMatched {
                pair: state.card(a).unwrap().pair_id,
                first: a,
                second: b,
                score: 10,
            },
        ]
    );

    sleep(Duration::from_millis(950)).await;
    assert_eq!(session.current().last_score_delta, 0);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_pre_advanced_engine_keeps_flip_back_delay() {
    let mut game = MemoryGame::with_seed(config(), 10);
    game.advance(60_000);
    let session = spawn_with_game(game);
    let (a, b) = mismatched(&session.current());

    session.select(a).await.unwrap();
    session.select(b).await.unwrap();

    sleep(Duration::from_millis(700)).await;
    assert!(session.current().locked);

    sleep(Duration::from_millis(150)).await; // t = 850
    let after = session.current();
    assert!(!after.locked);
    assert!(!after.card(a).unwrap().flipped);
    assert_eq!(after.last_time_delta, -5);

    // Delta clear is due 900 ms after the flip-back, on the same base
    sleep(Duration::from_millis(950)).await;
    assert_eq!(session.current().last_time_delta, 0);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_tick_interval_sets_countdown_pace() {
    let session = spawn_session(config().with_tick_interval(250), 11);

    sleep(Duration::from_millis(1100)).await;
    assert_eq!(session.current().time_left, 56);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_pending_flip_back() {
    let session = spawn_session(config(), 5);
    let mut events = session.subscribe();
    let first_generation = session.current().generation;
    let (a, b) = mismatched(&session.current());

    session.select(a).await.unwrap();
    session.select(b).await.unwrap();
    session.reset().await.unwrap();

    sleep(Duration::from_millis(900)).await;
    let state = session.current();
    assert_eq!(state.generation, first_generation.next());
    assert!(!state.locked);
    assert_eq!(state.time_left, 60);
    assert_eq!(state.last_time_delta, 0);
    assert!(state.deck.iter().all(|c| !c.flipped));

    let received = drain(&mut events);
    assert!(received.contains(&GameEvent::Dealt { cards: 8 }));
    assert!(!received
        .iter()
        .any(|e| matches!(e, GameEvent::FlippedBack { .. })));

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_reset_restarts_countdown() {
    let session = spawn_session(config(), 6);

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(session.current().time_left, 58);

    session.reset().await.unwrap();
    sleep(Duration::from_millis(900)).await; // 400 ms past the old tick phase
    assert_eq!(session.current().time_left, 60);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(session.current().time_left, 59);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_countdown_stops_at_zero() {
    let session = spawn_session(config().with_starting_time(2), 7);
    let mut events = session.subscribe();

    sleep(Duration::from_millis(10_000)).await;
    let state = session.current();
    assert_eq!(state.time_left, 0);
    assert_eq!(state.outcome(), GameOutcome::TimeUp);

    let received = drain(&mut events);
    assert_eq!(received.iter().filter(|e| **e == GameEvent::TimeUp).count(), 1);
    assert!(received.last().map_or(false, GameEvent::is_terminal));

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_watch_notifies_on_change() {
    let session = spawn_session(config(), 8);
    let mut watch = session.watch();
    let _ = watch.borrow_and_update();

    let (a, _) = mismatched(&session.current());
    session.send(Command::Select(a)).await.unwrap();

    watch.changed().await.unwrap();
    assert_eq!(watch.borrow().pending_selection(), &[a]);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_session() {
    let session: SessionHandle = spawn_session(config(), 9);
    let mut watch = session.watch();
    drop(session);

    // The sender side goes away once the task exits
    while watch.changed().await.is_ok() {}
}
