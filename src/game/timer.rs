//! Game clock driven by externally supplied timestamps (ms, e.g.
//! `performance.now()`), so it can be stepped deterministically in tests.

/// Granularity of the on-screen clock.
pub const DISPLAY_INTERVAL_MS: f64 = 1000.0;

/// Formats a duration as `mm:ss`.
pub fn format_time(ms: f64) -> String {
    let total_seconds = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// What a single `tick` observed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tick {
    pub elapsed_ms: f64,
    /// The displayed `mm:ss` value changed since the previous tick.
    pub display_changed: bool,
    /// Elapsed time crossed the limit. Reported once per start.
    pub expired: bool,
}

#[derive(Clone, Debug, Default)]
pub struct GameTimer {
    started_at: Option<f64>, // Some while running
    elapsed_ms: f64,
    limit_ms: Option<f64>,
    expiry_reported: bool,
    shown_seconds: u64,
}

impl GameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time_limit(&mut self, limit_ms: Option<f64>) {
        self.limit_ms = limit_ms.filter(|ms| *ms > 0.0);
    }

    pub fn time_limit_ms(&self) -> Option<f64> {
        self.limit_ms
    }

    /// Restarts from zero. The limit is kept.
    pub fn start(&mut self, now: f64) {
        self.started_at = Some(now);
        self.elapsed_ms = 0.0;
        self.expiry_reported = false;
        self.shown_seconds = 0;
    }

    /// Freezes elapsed time at `now`. No-op when not running.
    pub fn stop(&mut self, now: f64) {
        if let Some(start) = self.started_at.take() {
            self.elapsed_ms = (now - start).max(0.0);
        }
    }

    /// Stops and clears elapsed time and limit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn tick(&mut self, now: f64) -> Tick {
        let Some(start) = self.started_at else {
            return Tick {
                elapsed_ms: self.elapsed_ms,
                ..Tick::default()
            };
        };
        self.elapsed_ms = (now - start).max(0.0);

        let seconds = (self.elapsed_ms / DISPLAY_INTERVAL_MS).floor() as u64;
        let display_changed = seconds != self.shown_seconds;
        self.shown_seconds = seconds;

        let expired = match self.limit_ms {
            Some(limit) if !self.expiry_reported && self.elapsed_ms >= limit => {
                self.expiry_reported = true;
                true
            }
            _ => false,
        };

        Tick {
            elapsed_ms: self.elapsed_ms,
            display_changed,
            expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(999.0), "00:00");
        assert_eq!(format_time(61_500.0), "01:01");
        assert_eq!(format_time(3_600_000.0), "60:00");
    }

    #[test]
    fn test_expiry_fires_once() {
        let mut timer = GameTimer::new();
        timer.set_time_limit(Some(2_000.0));
        timer.start(100.0);
        assert!(!timer.tick(1_100.0).expired);
        assert!(timer.tick(2_100.0).expired);
        assert!(!timer.tick(3_100.0).expired);
    }

    #[test]
    fn test_display_changes_once_per_second() {
        let mut timer = GameTimer::new();
        timer.start(0.0);
        assert!(!timer.tick(16.0).display_changed);
        assert!(timer.tick(1_001.0).display_changed);
        assert!(!timer.tick(1_500.0).display_changed);
        assert!(timer.tick(2_000.0).display_changed);
    }

    #[test]
    fn test_stop_freezes_elapsed() {
        let mut timer = GameTimer::new();
        timer.start(1_000.0);
        timer.stop(4_000.0);
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_ms(), 3_000.0);
        let tick = timer.tick(10_000.0);
        assert_eq!(tick.elapsed_ms, 3_000.0);
        assert!(!tick.expired);
    }

    #[test]
    fn test_zero_limit_means_none() {
        let mut timer = GameTimer::new();
        timer.set_time_limit(Some(0.0));
        assert_eq!(timer.time_limit_ms(), None);
        timer.start(0.0);
        assert!(!timer.tick(1e9).expired);
    }
}
