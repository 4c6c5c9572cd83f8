//! Ephemeral completion tracking for the session being run.
//!
//! A [`SessionTracker`] holds at most one active session. The completion set
//! belongs to that session: opening a different session discards it, and
//! closing the tracker discards it too. Nothing here is persisted.

use crate::types::{ExerciseId, Session, SessionId};
use crate::{Error, Result};
use std::collections::BTreeSet;

/// Snapshot of how far the active session has got
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// `completed / total`, or 0 for a session without exercises
    pub ratio: f64,
    pub completed_minutes: u32,
    pub total_minutes: u32,
}

impl Progress {
    /// Ratio as a whole percentage, rounded to nearest
    pub fn percent(&self) -> u32 {
        (self.ratio * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

#[derive(Clone, Debug)]
struct ActiveSession {
    session_id: SessionId,
    /// (exercise id, minutes) in delivered order
    exercises: Vec<(ExerciseId, u32)>,
    completed: BTreeSet<ExerciseId>,
}

impl ActiveSession {
    /// A repeated exercise id keeps only its first occurrence
    fn new(session: &Session) -> Self {
        let mut seen = BTreeSet::new();
        let exercises = session
            .exercises
            .iter()
            .filter(|e| seen.insert(e.id))
            .map(|e| (e.id, e.duration_minutes))
            .collect();

        Self {
            session_id: session.id,
            exercises,
            completed: BTreeSet::new(),
        }
    }

    fn contains(&self, id: ExerciseId) -> bool {
        self.exercises.iter().any(|(e, _)| *e == id)
    }
}

/// Per-session completion state
#[derive(Clone, Debug, Default)]
pub struct SessionTracker {
    active: Option<ActiveSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `session` the active session
    ///
    /// Re-opening the active session keeps its completion set. Opening any
    /// other session starts from an empty set. Returns whether the set was
    /// reset.
    pub fn open(&mut self, session: &Session) -> bool {
        if self.active_session_id() == Some(session.id) {
            tracing::debug!("Session {} already active, keeping progress", session.id);
            return false;
        }

        if let Some(previous) = &self.active {
            tracing::debug!(
                "Switching from session {} to {}, discarding {} completed",
                previous.session_id,
                session.id,
                previous.completed.len()
            );
        }
        self.active = Some(ActiveSession::new(session));
        true
    }

    /// Flip the completion flag of an exercise of the active session
    ///
    /// Returns the new membership. Fails with `InvariantViolation` when no
    /// session is active or the exercise does not belong to it; the
    /// completion set is left untouched in that case.
    pub fn toggle(&mut self, exercise_id: ExerciseId) -> Result<bool> {
        let active = self.active.as_mut().ok_or_else(|| {
            Error::InvariantViolation(format!(
                "toggle of exercise {} with no active session",
                exercise_id
            ))
        })?;

        if !active.contains(exercise_id) {
            return Err(Error::InvariantViolation(format!(
                "exercise {} is not part of session {}",
                exercise_id, active.session_id
            )));
        }

        let now_completed = if active.completed.remove(&exercise_id) {
            false
        } else {
            active.completed.insert(exercise_id);
            true
        };
        tracing::debug!(
            "Session {} exercise {} completed={}",
            active.session_id,
            exercise_id,
            now_completed
        );
        Ok(now_completed)
    }

    pub fn is_completed(&self, exercise_id: ExerciseId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.completed.contains(&exercise_id))
    }

    /// Progress of the active session
    pub fn progress(&self) -> Result<Progress> {
        let active = self.active.as_ref().ok_or_else(|| {
            Error::InvariantViolation("progress requested with no active session".into())
        })?;

        let total = active.exercises.len();
        let completed = active.completed.len();
        let total_minutes: u32 = active.exercises.iter().map(|(_, m)| m).sum();
        let completed_minutes: u32 = active
            .exercises
            .iter()
            .filter(|(id, _)| active.completed.contains(id))
            .map(|(_, m)| m)
            .sum();
        let ratio = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };

        Ok(Progress {
            completed,
            total,
            ratio,
            completed_minutes,
            total_minutes,
        })
    }

    /// First exercise, in delivered order, not yet completed
    pub fn next_pending(&self) -> Option<ExerciseId> {
        let active = self.active.as_ref()?;
        active
            .exercises
            .iter()
            .map(|(id, _)| *id)
            .find(|id| !active.completed.contains(id))
    }

    /// Drop the active session and its completion set
    pub fn close(&mut self) {
        if let Some(previous) = self.active.take() {
            tracing::debug!("Closed session {}", previous.session_id);
        }
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.active.as_ref().map(|a| a.session_id)
    }

    /// Completed exercise ids in ascending order
    pub fn completed(&self) -> Vec<ExerciseId> {
        self.active
            .as_ref()
            .map(|a| a.completed.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::types::SessionType;

    fn seed_session(id: SessionId) -> Session {
        get_default_catalog()
            .plan
            .weekly_blocks
            .iter()
            .flat_map(|w| w.sessions.iter())
            .find(|s| s.id == id)
            .cloned()
            .unwrap()
    }

    fn all_seed_sessions() -> Vec<Session> {
        get_default_catalog()
            .plan
            .weekly_blocks
            .iter()
            .flat_map(|w| w.sessions.iter().cloned())
            .collect()
    }

    fn empty_session() -> Session {
        Session {
            id: 77,
            kind: SessionType::TacticalPlay,
            name: "Sin ejercicios".into(),
            day_label: "Sábado".into(),
            duration_minutes: 90,
            image_ref: String::new(),
            exercises: vec![],
        }
    }

    fn assert_subset_of_active(tracker: &SessionTracker, session: &Session) {
        for id in tracker.completed() {
            assert!(
                session.exercise(id).is_some(),
                "completed id {} not in session {}",
                id,
                session.id
            );
        }
    }

    #[test]
    fn test_full_completion_of_session_one() {
        let session = seed_session(1);
        let mut tracker = SessionTracker::new();
        tracker.open(&session);

        for id in 1..=6 {
            assert!(tracker.toggle(id).unwrap());
        }

        let progress = tracker.progress().unwrap();
        assert_eq!(progress.completed, 6);
        assert_eq!(progress.total, 6);
        assert_eq!(progress.ratio, 1.0);
        assert_eq!(progress.percent(), 100);
        assert!(progress.is_complete());
        assert_eq!(progress.completed_minutes, 90);
        assert!((1..=6).all(|k| tracker.is_completed(k)));
    }

    #[test]
    fn test_double_toggle_is_noop() {
        let session = seed_session(1);
        let mut tracker = SessionTracker::new();
        tracker.open(&session);

        assert!(tracker.toggle(3).unwrap());
        assert!(!tracker.toggle(3).unwrap());

        assert!(tracker.completed().is_empty());
        assert_eq!(tracker.progress().unwrap().ratio, 0.0);
    }

    #[test]
    fn test_double_toggle_preserves_other_progress() {
        let mut tracker = SessionTracker::new();
        for session in all_seed_sessions() {
            tracker.open(&session);
            let first = session.exercises[0].id;
            tracker.toggle(first).unwrap();

            for e in &session.exercises[1..] {
                let before = tracker.progress().unwrap();
                tracker.toggle(e.id).unwrap();
                tracker.toggle(e.id).unwrap();
                assert_eq!(tracker.progress().unwrap(), before);
                assert!(!tracker.is_completed(e.id));
            }
            assert!(tracker.is_completed(first));
        }
    }

    #[test]
    fn test_switching_session_resets_progress() {
        let mut tracker = SessionTracker::new();
        let first = seed_session(1);
        let second = seed_session(2);
        assert_eq!(second.name, "Desarrollo coordinativo básico");

        tracker.open(&first);
        tracker.toggle(1).unwrap();
        tracker.toggle(2).unwrap();

        assert!(tracker.open(&second));
        assert!(tracker.completed().is_empty());
        assert!(!tracker.is_completed(1));

        // Going back to session 1 does not bring its flags back
        assert!(tracker.open(&first));
        assert!(tracker.completed().is_empty());
    }

    #[test]
    fn test_reopening_same_session_keeps_progress() {
        let session = seed_session(4);
        let mut tracker = SessionTracker::new();
        tracker.open(&session);
        tracker.toggle(2).unwrap();

        assert!(!tracker.open(&session));
        assert_eq!(tracker.completed(), vec![2]);
    }

    #[test]
    fn test_completing_every_exercise_reaches_ratio_one() {
        for session in all_seed_sessions() {
            let mut tracker = SessionTracker::new();
            tracker.open(&session);
            for e in &session.exercises {
                tracker.toggle(e.id).unwrap();
                assert_subset_of_active(&tracker, &session);
            }
            let progress = tracker.progress().unwrap();
            assert_eq!(progress.ratio, 1.0, "session {}", session.id);
            assert!(progress.completed <= progress.total);
        }
    }

    #[test]
    fn test_empty_session_ratio_is_zero() {
        let mut tracker = SessionTracker::new();
        tracker.open(&empty_session());

        let progress = tracker.progress().unwrap();
        assert_eq!(progress.total, 0);
        assert_eq!(progress.ratio, 0.0);
        assert_eq!(progress.percent(), 0);
        assert!(!progress.is_complete());
        assert_eq!(tracker.next_pending(), None);
    }

    #[test]
    fn test_repeated_exercise_id_counts_once() {
        let mut session = seed_session(1);
        let mut repeat = session.exercises[0].clone();
        repeat.duration_minutes = 40;
        session.exercises.push(repeat);

        let mut tracker = SessionTracker::new();
        tracker.open(&session);
        for id in 1..=6 {
            tracker.toggle(id).unwrap();
        }

        let progress = tracker.progress().unwrap();
        assert_eq!((progress.completed, progress.total), (6, 6));
        assert!(progress.is_complete());
        assert_eq!(progress.total_minutes, seed_session(1).exercise_minutes());
        assert_eq!(progress.completed_minutes, progress.total_minutes);
    }

    #[test]
    fn test_toggle_unknown_exercise_is_invariant_violation() {
        let session = seed_session(6);
        let mut tracker = SessionTracker::new();
        tracker.open(&session);
        tracker.toggle(1).unwrap();

        // Session 6 has only five exercises
        let err = tracker.toggle(6).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert_eq!(tracker.completed(), vec![1]);
    }

    #[test]
    fn test_no_active_session() {
        let mut tracker = SessionTracker::new();
        assert!(matches!(
            tracker.toggle(1),
            Err(Error::InvariantViolation(_))
        ));
        assert!(matches!(
            tracker.progress(),
            Err(Error::InvariantViolation(_))
        ));
        assert!(!tracker.is_completed(1));
        assert_eq!(tracker.active_session_id(), None);
    }

    #[test]
    fn test_close_discards_everything() {
        let session = seed_session(1);
        let mut tracker = SessionTracker::new();
        tracker.open(&session);
        tracker.toggle(5).unwrap();

        tracker.close();
        assert_eq!(tracker.active_session_id(), None);
        assert!(tracker.completed().is_empty());

        // Re-opening after close starts clean
        assert!(tracker.open(&session));
        assert!(!tracker.is_completed(5));
    }

    #[test]
    fn test_next_pending_follows_delivered_order() {
        let session = seed_session(2);
        let mut tracker = SessionTracker::new();
        tracker.open(&session);
        assert_eq!(tracker.next_pending(), Some(1));

        tracker.toggle(1).unwrap();
        tracker.toggle(3).unwrap();
        assert_eq!(tracker.next_pending(), Some(2));

        let progress = tracker.progress().unwrap();
        assert_eq!(progress.completed_minutes, 10 + 15);
        assert_eq!(progress.total_minutes, 90);
        assert_eq!(progress.percent(), 33);
    }
}
