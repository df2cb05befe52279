use serde::Serialize;

/// Wall-clock counter for an active session, advanced by external ticks.
///
/// Pausing only gates the increment; the tick source keeps running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionTimer {
    elapsed_seconds: u64,
    running: bool,
    paused: bool,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the timer was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.paused = false;
        true
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn tick(&mut self) -> bool {
        if self.running && !self.paused {
            self.elapsed_seconds += 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn elapsed_minutes(&self) -> u32 {
        u32::try_from(self.elapsed_seconds / 60).unwrap_or(u32::MAX)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut timer = SessionTimer::new();
        assert!(!timer.tick());
        assert_eq!(timer.elapsed_seconds(), 0);
    }

    #[test]
    fn test_start_twice_has_no_effect() {
        let mut timer = SessionTimer::new();
        assert!(timer.start());
        timer.tick();
        assert!(!timer.start());
        assert_eq!(timer.elapsed_seconds(), 1);
    }

    #[test]
    fn test_pause_gates_increment() {
        let mut timer = SessionTimer::new();
        timer.start();
        timer.tick();
        timer.pause();
        timer.tick();
        timer.tick();
        assert_eq!(timer.elapsed_seconds(), 1);
        assert!(timer.is_running());

        timer.resume();
        timer.tick();
        assert_eq!(timer.elapsed_seconds(), 2);
    }

    #[test]
    fn test_reset_zeroes_and_stops() {
        let mut timer = SessionTimer::new();
        timer.start();
        for _ in 0..125 {
            timer.tick();
        }
        assert_eq!(timer.elapsed_minutes(), 2);

        timer.reset();
        assert_eq!(timer.elapsed_seconds(), 0);
        assert!(!timer.is_running());
        assert!(!timer.tick());
    }
}
