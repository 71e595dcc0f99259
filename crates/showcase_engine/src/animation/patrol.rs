//! Linear patrol along one axis

use super::Rate;
use crate::foundation::math::{Axis, Transform};

/// What happens when a patrol crosses its bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundPolicy {
    /// Wrap into `[min, max)` by the amount overshot
    Wrap,
    /// Jump to a fixed spawn coordinate
    ResetTo(f32),
}

/// Result of one patrol step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolStep {
    /// New coordinate
    pub value: f32,
    /// Whether a bound was crossed this step
    pub crossed: bool,
}

/// Moves one coordinate of a transform at a constant rate between bounds
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPatrol {
    /// Driven axis
    pub axis: Axis,
    /// Signed speed
    pub rate: Rate,
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
    /// Bound policy
    pub policy: BoundPolicy,
}

impl LinearPatrol {
    /// Create a patrol
    pub fn new(axis: Axis, rate: Rate, min: f32, max: f32, policy: BoundPolicy) -> Self {
        Self {
            axis,
            rate,
            min: min.min(max),
            max: max.max(min),
            policy,
        }
    }

    /// Advance a coordinate by one tick
    pub fn step(&self, value: f32, elapsed: f32) -> PatrolStep {
        let next = value + self.rate.step(elapsed);
        match self.policy {
            BoundPolicy::Wrap => {
                let span = self.max - self.min;
                if span <= 0.0 {
                    return PatrolStep {
                        value: self.min,
                        crossed: next != self.min,
                    };
                }
                if next >= self.max || next < self.min {
                    PatrolStep {
                        value: self.min + (next - self.min).rem_euclid(span),
                        crossed: true,
                    }
                } else {
                    PatrolStep {
                        value: next,
                        crossed: false,
                    }
                }
            }
            BoundPolicy::ResetTo(spawn) => {
                if next > self.max || next < self.min {
                    PatrolStep {
                        value: spawn,
                        crossed: true,
                    }
                } else {
                    PatrolStep {
                        value: next,
                        crossed: false,
                    }
                }
            }
        }
    }

    /// Advance the patrolled coordinate of a transform
    pub fn apply(&self, transform: &mut Transform, elapsed: f32) -> PatrolStep {
        let step = self.step(self.axis.get(&transform.position), elapsed);
        self.axis.set(&mut transform.position, step.value);
        step
    }
}
