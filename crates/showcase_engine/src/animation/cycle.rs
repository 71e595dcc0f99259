//! Timed reset cycle

/// Accumulates elapsed time and fires once per period
///
/// On firing the accumulator is zeroed, not reduced by the period, so a
/// long frame never fires twice in a row.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedCycle {
    period: f32,
    elapsed: f32,
}

impl TimedCycle {
    /// Create a cycle with the given period in seconds
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Add elapsed time; returns true when the period was reached this tick
    pub fn advance(&mut self, elapsed: f32) -> bool {
        self.elapsed += elapsed;
        if self.elapsed >= self.period {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Time accumulated in the current period
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction of the period completed, in `[0, 1)`
    pub fn progress(&self) -> f32 {
        if self.period > 0.0 {
            self.elapsed / self.period
        } else {
            0.0
        }
    }

    /// Restart the period
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_period() {
        let mut cycle = TimedCycle::new(8.0);
        for _ in 0..7 {
            assert!(!cycle.advance(1.0));
        }
        assert!(cycle.advance(1.0));
        assert_eq!(cycle.elapsed(), 0.0);
    }

    #[test]
    fn test_long_frame_fires_once() {
        let mut cycle = TimedCycle::new(8.0);
        assert!(cycle.advance(20.0));
        assert!(!cycle.advance(0.5));
        assert_eq!(cycle.progress(), 0.0625);
    }
}
