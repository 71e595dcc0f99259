//! Color channel ramp

use super::Rate;
use crate::render::Color;

/// Raises color channels toward a ceiling at independent rates
///
/// A channel only moves while it is below its ceiling; one step may
/// overshoot it slightly, matching how the scene scripts were tuned.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRamp {
    initial: Color,
    rates: [Rate; 3],
    ceiling: [f32; 3],
}

impl ChannelRamp {
    /// Ramp starting from `initial` with per-channel rates and a ceiling of 1.0
    pub fn new(initial: Color, rates: [Rate; 3]) -> Self {
        Self {
            initial,
            rates,
            ceiling: [1.0; 3],
        }
    }

    /// Builder: per-channel ceilings
    #[must_use]
    pub fn with_ceiling(mut self, ceiling: [f32; 3]) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Color the ramp starts from and resets to
    pub fn initial(&self) -> Color {
        self.initial
    }

    /// Advance a color by one tick
    pub fn apply(&self, color: &mut Color, elapsed: f32) {
        let mut channels = color.to_array();
        for (index, channel) in channels.iter_mut().enumerate() {
            if *channel < self.ceiling[index] {
                *channel += self.rates[index].step(elapsed);
            }
        }
        *color = Color::from_array(channels);
    }

    /// Restore the initial color
    pub fn reset(&self, color: &mut Color) {
        *color = self.initial;
    }

    /// Whether every channel has reached its ceiling
    pub fn is_saturated(&self, color: &Color) -> bool {
        color
            .to_array()
            .iter()
            .zip(self.ceiling)
            .all(|(channel, ceiling)| *channel >= ceiling)
    }
}
