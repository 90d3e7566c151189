//! Audio cue contract.
//!
//! The engine never plays sound. A presentation layer maps engine events to
//! one of three cues and hands them to a `CueSink`; nothing flows back.

use serde::{Deserialize, Serialize};

use crate::engine::GameEvent;

/// Oscillator shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

/// One synthesized tone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Pitch in hertz.
    pub frequency_hz: f32,
    /// Length of the tone.
    pub duration_ms: u32,
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Start offset from the moment the cue is played.
    pub offset_ms: u32,
}

impl Tone {
    const fn new(frequency_hz: f32, duration_ms: u32, waveform: Waveform, offset_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
            waveform,
            offset_ms,
        }
    }
}

const FLIP_TONES: [Tone; 1] = [Tone::new(1200.0, 60, Waveform::Sine, 0)];

const MATCH_TONES: [Tone; 2] = [
    Tone::new(880.0, 120, Waveform::Sine, 0),
    Tone::new(1320.0, 120, Waveform::Sine, 80),
];

const MISMATCH_TONES: [Tone; 1] = [Tone::new(220.0, 180, Waveform::Sawtooth, 0)];

/// A short sound the presentation layer plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Flip,
    Match,
    Mismatch,
}

impl Cue {
    /// Tones making up this cue.
    #[must_use]
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::Flip => &FLIP_TONES,
            Cue::Match => &MATCH_TONES,
            Cue::Mismatch => &MISMATCH_TONES,
        }
    }

    /// Cue for an engine event, if it has one.
    ///
    /// The mismatch cue sounds when the pair flips back and time was
    /// actually taken; a penalty clamped to nothing is silent.
    #[must_use]
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::CardRevealed { .. } => Some(Cue::Flip),
            GameEvent::PairMatched { .. } => Some(Cue::Match),
            GameEvent::FlippedBack { time_delta, .. } if *time_delta < 0 => Some(Cue::Mismatch),
            _ => None,
        }
    }
}

/// Something that can play cues.
pub trait CueSink {
    /// Play a cue. Must not block.
    fn play(&mut self, cue: Cue);
}

/// Play the cue for every event that has one, in order.
pub fn dispatch<'a, S, I>(sink: &mut S, events: I)
where
    S: CueSink + ?Sized,
    I: IntoIterator<Item = &'a GameEvent>,
{
    for cue in events.into_iter().filter_map(Cue::for_event) {
        sink.play(cue);
    }
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCueSink;

impl CueSink for NullCueSink {
    fn play(&mut self, _cue: Cue) {}
}

/// Keeps every cue it is given.
#[derive(Clone, Debug, Default)]
pub struct RecordingCueSink {
    pub played: Vec<Cue>,
}

impl CueSink for RecordingCueSink {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardId, PairId};

    #[test]
    fn test_tone_table() {
        assert_eq!(Cue::Flip.tones().len(), 1);
        assert_eq!(Cue::Flip.tones()[0].frequency_hz, 1200.0);

        let matched = Cue::Match.tones();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[1].offset_ms, 80);

        assert_eq!(Cue::Mismatch.tones()[0].waveform, Waveform::Sawtooth);
    }

    #[test]
    fn test_dispatch_maps_events() {
        let events = vec![
            GameEvent::Dealt { cards: 4 },
            GameEvent::CardRevealed { card: CardId::new(0) },
            GameEvent::CardRevealed { card: CardId::new(1) },
            GameEvent::PairMatched {
                pair: PairId::new(0),
                first: CardId::new(0),
                second: CardId::new(1),
                score: 10,
            },
            GameEvent::PairMismatched {
                first: CardId::new(2),
                second: CardId::new(3),
            },
            GameEvent::FlippedBack {
                first: CardId::new(2),
                second: CardId::new(3),
                time_delta: -5,
            },
            GameEvent::ScoreDeltaCleared,
        ];

        let mut sink = RecordingCueSink::default();
        dispatch(&mut sink, &events);

        assert_eq!(sink.played, vec![Cue::Flip, Cue::Flip, Cue::Match, Cue::Mismatch]);
    }

    #[test]
    fn test_mismatch_cue_waits_for_flip_back() {
        let detected = GameEvent::PairMismatched {
            first: CardId::new(0),
            second: CardId::new(2),
        };
        assert_eq!(Cue::for_event(&detected), None);

        // Out of time already: nothing was deducted, nothing sounds
        let free = GameEvent::FlippedBack {
            first: CardId::new(0),
            second: CardId::new(2),
            time_delta: 0,
        };
        assert_eq!(Cue::for_event(&free), None);

        let penalized = GameEvent::FlippedBack {
            first: CardId::new(0),
            second: CardId::new(2),
            time_delta: -3,
        };
        assert_eq!(Cue::for_event(&penalized), Some(Cue::Mismatch));
    }

    #[test]
    fn test_null_sink() {
        let mut sink = NullCueSink;
        dispatch(&mut sink, &[GameEvent::TimeUp]);
    }
}
