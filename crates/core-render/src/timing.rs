//! Pacing between stream refreshes.

use std::time::Duration;

/// Pause after each refresh so a fast producer does not repaint on every
/// token. The shorter interval follows whole-line rewrites, which flash when
/// left on screen half-drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    pub refresh_interval: Duration,
    pub whole_line_interval: Duration,
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(50),
            whole_line_interval: Duration::from_millis(20),
        }
    }
}

impl Throttle {
    /// No pacing at all (non-interactive output, tests).
    pub const fn none() -> Self {
        Self {
            refresh_interval: Duration::ZERO,
            whole_line_interval: Duration::ZERO,
        }
    }

    pub fn from_millis(refresh_ms: u64, whole_line_ms: u64) -> Self {
        Self {
            refresh_interval: Duration::from_millis(refresh_ms),
            whole_line_interval: Duration::from_millis(whole_line_ms),
        }
    }

    pub fn interval(&self, redo_whole_line: bool) -> Duration {
        if redo_whole_line {
            self.whole_line_interval
        } else {
            self.refresh_interval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_line_rewrites_use_the_short_interval() {
        let t = Throttle::default();
        assert_eq!(t.interval(true), Duration::from_millis(20));
        assert_eq!(t.interval(false), Duration::from_millis(50));
        assert_eq!(Throttle::none().interval(false), Duration::ZERO);
    }
}
