//! Path following along a Catmull-Rom spline

use super::Rate;
use crate::foundation::math::{utils::deg_to_rad, Vec3};

/// Open uniform Catmull-Rom curve through a list of points
///
/// Uses tension 0.5. The segments at either end use a control point
/// mirrored from the first/last segment so the curve passes through every
/// input point.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    tension: f32,
}

impl CatmullRomCurve {
    /// Curve through `points`
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            tension: 0.5,
        }
    }

    /// Control points
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Point at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Vec3 {
        let count = self.points.len();
        match count {
            0 => return Vec3::zeros(),
            1 => return self.points[0],
            _ => {}
        }

        let t = t.clamp(0.0, 1.0);
        let p = (count - 1) as f32 * t;
        let mut segment = p.floor() as usize;
        let mut weight = p - segment as f32;
        if segment >= count - 1 {
            segment = count - 2;
            weight = 1.0;
        }

        let p1 = self.points[segment];
        let p2 = self.points[segment + 1];
        let p0 = if segment > 0 {
            self.points[segment - 1]
        } else {
            p1 + (p1 - p2)
        };
        let p3 = if segment + 2 < count {
            self.points[segment + 2]
        } else {
            p2 + (p2 - p1)
        };

        let tangent1 = (p2 - p0) * self.tension;
        let tangent2 = (p3 - p1) * self.tension;
        let c2 = p1 * -3.0 + p2 * 3.0 - tangent1 * 2.0 - tangent2;
        let c3 = p1 * 2.0 - p2 * 2.0 + tangent1 + tangent2;
        p1 + tangent1 * weight + c2 * (weight * weight) + c3 * (weight * weight * weight)
    }

    /// Unit tangent at `t`, by central difference
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        const DELTA: f32 = 0.0001;
        let t1 = (t - DELTA).max(0.0);
        let t2 = (t + DELTA).min(1.0);
        let direction = self.point_at(t2) - self.point_at(t1);
        direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::z)
    }
}

/// Position and heading produced by a [`PathFollower`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPose {
    /// World position
    pub position: Vec3,
    /// Rotation about Y in radians; +Z faces along the path plus the banking offset
    pub yaw: f32,
}

/// Moves along a curve with normalized progress in `[0, 1)`
///
/// The heading follows the curve tangent, plus an extra yaw that ramps
/// linearly from zero to `max_extra_yaw` at the midpoint and back to zero
/// at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    curve: CatmullRomCurve,
    rate: Rate,
    offset: Vec3,
    max_extra_yaw: f32,
    progress: f32,
}

impl PathFollower {
    /// Follow `curve`, advancing progress by `rate`
    pub fn new(curve: CatmullRomCurve, rate: Rate) -> Self {
        Self {
            curve,
            rate,
            offset: Vec3::zeros(),
            max_extra_yaw: deg_to_rad(45.0),
            progress: 0.0,
        }
    }

    /// Builder: constant world offset added to every curve point
    #[must_use]
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Builder: peak extra yaw in radians
    #[must_use]
    pub fn with_max_extra_yaw(mut self, radians: f32) -> Self {
        self.max_extra_yaw = radians;
        self
    }

    /// Current progress
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// The curve being followed
    pub fn curve(&self) -> &CatmullRomCurve {
        &self.curve
    }

    /// Extra yaw at progress `t`
    pub fn extra_yaw(&self, t: f32) -> f32 {
        if t < 0.5 {
            self.max_extra_yaw * (t / 0.5)
        } else {
            self.max_extra_yaw * (1.0 - (t - 0.5) / 0.5)
        }
    }

    /// Pose at progress `t` without advancing
    pub fn pose_at(&self, t: f32) -> PathPose {
        let position = self.curve.point_at(t) + self.offset;
        let tangent = self.curve.tangent_at(t);
        PathPose {
            position,
            yaw: tangent.x.atan2(tangent.z) + self.extra_yaw(t),
        }
    }

    /// Advance one tick and return the new pose
    ///
    /// Progress wraps around 1 keeping the overshoot, so splitting a tick
    /// into shorter ones lands on the same point.
    pub fn advance(&mut self, elapsed: f32) -> PathPose {
        let progress = (self.progress + self.rate.step(elapsed)).rem_euclid(1.0);
        self.progress = if (0.0..1.0).contains(&progress) { progress } else { 0.0 };
        self.pose_at(self.progress)
    }

    /// Back to the start of the curve
    pub fn reset(&mut self) {
        self.progress = 0.0;
    }
}
