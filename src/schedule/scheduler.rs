//! Generation-keyed deferred tasks on a virtual millisecond clock.
//!
//! Tasks are stamped with the generation current when they were scheduled.
//! Advancing the generation drops every pending task, and a task whose
//! generation no longer matches is never handed out, so nothing scheduled
//! for a superseded deal can touch the next one.

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Unique identifier for a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Create a new task ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// Deal counter. Bumped on every reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gen({})", self.0)
    }
}

/// What a task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Turn a mismatched pair face-down, apply the penalty, release the lock.
    FlipBack { first: CardId, second: CardId },

    /// Reset `last_score_delta` to zero.
    ClearScoreDelta,

    /// Reset `last_time_delta` to zero.
    ClearTimeDelta,
}

/// A deferred task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Unique identifier (also the tie-break between equal deadlines).
    pub id: TaskId,

    /// Virtual time the task becomes due.
    pub due_at_ms: u64,

    /// Deal the task was scheduled for.
    pub generation: Generation,

    /// What to do.
    pub kind: TaskKind,
}

/// Pending deferred tasks for one engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scheduler {
    /// Pending tasks, unordered.
    pending: Vec<ScheduledTask>,

    /// Generation new tasks are stamped with.
    generation: Generation,

    /// Next task ID.
    next_id: u64,
}

impl Scheduler {
    /// Create an empty scheduler at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// No pending tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate over pending tasks.
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.pending.iter()
    }

    /// Schedule `kind` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, kind: TaskKind) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;

        self.pending.push(ScheduledTask {
            id,
            due_at_ms: now_ms.saturating_add(delay_ms),
            generation: self.generation,
            kind,
        });
        id
    }

    /// Schedule `kind`, dropping any pending task of the same kind first.
    pub fn replace(&mut self, now_ms: u64, delay_ms: u64, kind: TaskKind) -> TaskId {
        self.pending.retain(|t| t.kind != kind);
        self.schedule(now_ms, delay_ms, kind)
    }

    /// Start a new generation, dropping everything pending.
    ///
    /// Returns the number of tasks dropped.
    pub fn advance_generation(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.generation = self.generation.next();
        dropped
    }

    /// Does this task belong to the current generation?
    #[must_use]
    pub fn is_current(&self, task: &ScheduledTask) -> bool {
        task.generation == self.generation
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|t| t.due_at_ms).min()
    }

    /// Remove and return the earliest task due at or before `now_ms`.
    ///
    /// Ties go to the task scheduled first. Stale tasks are discarded.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<ScheduledTask> {
        let generation = self.generation;
        self.pending.retain(|t| t.generation == generation);

        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at_ms <= now_ms)
            .min_by_key(|(_, t)| (t.due_at_ms, t.id))
            .map(|(i, _)| i)?;

        Some(self.pending.swap_remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flip(a: u32, b: u32) -> TaskKind {
        TaskKind::FlipBack {
            first: CardId::new(a),
            second: CardId::new(b),
        }
    }

    #[test]
    fn test_schedule_and_pop() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, 800, flip(0, 1));

        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_deadline(), Some(900));
        assert!(scheduler.pop_due(899).is_none());

        let task = scheduler.pop_due(900).unwrap();
        assert_eq!(task.kind, flip(0, 1));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_pop_order() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(0, 900, TaskKind::ClearScoreDelta);
        let early = scheduler.schedule(0, 800, flip(0, 1));
        let tied = scheduler.schedule(0, 900, TaskKind::ClearTimeDelta);

        assert_eq!(scheduler.pop_due(1000).unwrap().id, early);
        assert_eq!(scheduler.pop_due(1000).unwrap().id, late);
        assert_eq!(scheduler.pop_due(1000).unwrap().id, tied);
        assert!(scheduler.pop_due(1000).is_none());
    }

    #[test]
    fn test_replace_same_kind() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0, 900, TaskKind::ClearScoreDelta);
        scheduler.schedule(0, 800, flip(0, 1));
        scheduler.replace(500, 900, TaskKind::ClearScoreDelta);

        assert_eq!(scheduler.len(), 2);
        let deadlines: Vec<_> = scheduler
            .pending()
            .filter(|t| t.kind == TaskKind::ClearScoreDelta)
            .map(|t| t.due_at_ms)
            .collect();
        assert_eq!(deadlines, vec![1400]);
    }

    #[test]
    fn test_advance_generation_drops_pending() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0, 800, flip(2, 5));
        scheduler.schedule(0, 900, TaskKind::ClearScoreDelta);

        let stale = scheduler.pending().next().cloned().unwrap();
        assert_eq!(scheduler.advance_generation(), 2);

        assert_eq!(scheduler.generation(), Generation(1));
        assert!(!scheduler.is_current(&stale));
        assert!(scheduler.pop_due(u64::MAX).is_none());
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_ids_stay_unique_across_generations() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(0, 1, TaskKind::ClearScoreDelta);
        scheduler.advance_generation();
        let b = scheduler.schedule(0, 1, TaskKind::ClearScoreDelta);

        assert_ne!(a, b);
        assert_eq!(format!("{}", b), "Task(1)");
    }
}
