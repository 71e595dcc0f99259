//! Time management utilities

use std::time::Instant;

/// Wall-clock frame timer
///
/// Measures the raw time between successive [`Timer::update`] calls. The
/// value is unclamped; feed it to a [`FrameClock`] before using it to drive
/// animation.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame) and return the raw delta
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Clamped simulation clock
///
/// Converts raw frame deltas into the elapsed time handed to animators.
/// Negative or non-finite deltas become zero and large deltas (a tab that
/// was in the background, a debugger pause) are capped at `max_delta` so
/// actors never jump across the scene in a single tick.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_delta: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock with the given cap on per-tick elapsed time
    pub fn new(max_delta: f32) -> Self {
        Self {
            max_delta: max_delta.max(0.0),
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Clamp a raw delta without advancing the clock
    pub fn clamp(&self, raw_delta: f32) -> f32 {
        if raw_delta.is_finite() {
            raw_delta.clamp(0.0, self.max_delta)
        } else {
            0.0
        }
    }

    /// Advance by a raw delta and return the clamped elapsed time
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        let elapsed = self.clamp(raw_delta);
        self.total_time += elapsed;
        self.frame_count += 1;
        elapsed
    }

    /// Maximum elapsed time a single tick may report
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Total clamped time since creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks advanced
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
