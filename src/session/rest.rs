use std::time::Duration;

use serde::Serialize;

/// Pause between reaching zero and running the completion callback.
pub const REST_COMPLETION_DELAY: Duration = Duration::from_millis(500);

/// Seconds added by a single "extend" press in the client.
pub const DEFAULT_EXTEND_SECONDS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestState {
    #[default]
    Idle,
    Running,
    Expired,
    Skipped,
}

/// Countdown shown between sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestTimer {
    state: RestState,
    remaining: u32,
    total_duration: u32,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new interval. A zero duration expires immediately.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.total_duration = seconds;
        self.state = if seconds == 0 {
            RestState::Expired
        } else {
            RestState::Running
        };
    }

    /// One-second countdown step. Returns true on the tick that expires it.
    pub fn tick(&mut self) -> bool {
        if self.state != RestState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = RestState::Expired;
            return true;
        }
        false
    }

    pub fn extend(&mut self, seconds: u32) -> bool {
        if self.state != RestState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_add(seconds);
        self.total_duration = self.total_duration.saturating_add(seconds);
        true
    }

    pub fn skip(&mut self) -> bool {
        if self.state != RestState::Running {
            return false;
        }
        self.state = RestState::Skipped;
        true
    }

    /// Consume a finished interval, returning to idle.
    pub fn take_finished(&mut self) -> Option<RestState> {
        match self.state {
            RestState::Expired | RestState::Skipped => {
                let finished = self.state;
                *self = Self::default();
                Some(finished)
            }
            RestState::Idle | RestState::Running => None,
        }
    }

    pub fn discard(&mut self) {
        *self = Self::default();
    }

    pub fn state(&self) -> RestState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total_duration(&self) -> u32 {
        self.total_duration
    }

    pub fn is_running(&self) -> bool {
        self.state == RestState::Running
    }

    /// Any interval that has not yet been consumed by the completion callback.
    pub fn is_pending(&self) -> bool {
        self.state != RestState::Idle
    }

    /// Fraction of the interval already elapsed, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.total_duration == 0 {
            return 0.0;
        }
        f64::from(self.total_duration - self.remaining) / f64::from(self.total_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_expired() {
        let mut rest = RestTimer::new();
        rest.start(3);
        assert!(!rest.tick());
        assert!(!rest.tick());
        assert!(rest.tick());
        assert_eq!(rest.state(), RestState::Expired);
        assert!(!rest.tick());
        assert_eq!(rest.remaining(), 0);
    }

    #[test]
    fn test_extend_adds_to_remaining_and_total() {
        let mut rest = RestTimer::new();
        rest.start(90);
        for _ in 0..50 {
            rest.tick();
        }
        assert!(rest.extend(DEFAULT_EXTEND_SECONDS));
        assert_eq!(rest.remaining(), 70);
        assert_eq!(rest.total_duration(), 120);
    }

    #[test]
    fn test_extend_ignored_unless_running() {
        let mut rest = RestTimer::new();
        assert!(!rest.extend(30));
        assert_eq!(rest.total_duration(), 0);

        rest.start(1);
        rest.tick();
        assert!(!rest.extend(30));
        assert_eq!(rest.remaining(), 0);
    }

    #[test]
    fn test_skip_then_take_finished() {
        let mut rest = RestTimer::new();
        rest.start(60);
        assert!(rest.skip());
        assert!(!rest.skip());
        assert_eq!(rest.take_finished(), Some(RestState::Skipped));
        assert_eq!(rest.state(), RestState::Idle);
        assert_eq!(rest.take_finished(), None);
    }

    #[test]
    fn test_zero_duration_expires_immediately() {
        let mut rest = RestTimer::new();
        rest.start(0);
        assert_eq!(rest.state(), RestState::Expired);
        assert_eq!(rest.progress(), 0.0);
    }

    #[test]
    fn test_progress_keeps_elapsed_after_extend() {
        let mut rest = RestTimer::new();
        rest.start(60);
        for _ in 0..30 {
            rest.tick();
        }
        assert!((rest.progress() - 0.5).abs() < f64::EPSILON);
        rest.extend(60);
        assert!((rest.progress() - 0.25).abs() < f64::EPSILON);
    }
}
