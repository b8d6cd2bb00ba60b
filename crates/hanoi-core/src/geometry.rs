//! World-space vectors and the interpolation curves used by the animator.

use serde::{Deserialize, Serialize};

use crate::fixed::Fixed64;

/// A point in world space. `y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: Fixed64,
    pub y: Fixed64,
    pub z: Fixed64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: Fixed64::ZERO,
        y: Fixed64::ZERO,
        z: Fixed64::ZERO,
    };

    pub fn new(x: Fixed64, y: Fixed64, z: Fixed64) -> Self {
        Self { x, y, z }
    }

    /// Build from f64 components. Initialization only.
    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self::new(
            Fixed64::from_num(x),
            Fixed64::from_num(y),
            Fixed64::from_num(z),
        )
    }

    /// Same point with `y` replaced.
    pub fn with_y(self, y: Fixed64) -> Self {
        Self { y, ..self }
    }

    /// Linear interpolation between `a` and `b`. `t` is clamped to [0, 1].
    pub fn lerp(a: Vec3, b: Vec3, t: Fixed64) -> Vec3 {
        let t = t.clamp(Fixed64::ZERO, Fixed64::ONE);
        Vec3 {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            z: a.z + (b.z - a.z) * t,
        }
    }
}

/// Hermite smooth step, `t²(3 − 2t)`, with `t` clamped to [0, 1].
/// Zero slope at both ends: the motion accelerates, then decelerates.
pub fn smooth_step(t: Fixed64) -> Fixed64 {
    let t = t.clamp(Fixed64::ZERO, Fixed64::ONE);
    let three = Fixed64::from_num(3);
    let two = Fixed64::from_num(2);
    t * t * (three - two * t)
}

/// Interpolation curve applied to the normalized phase progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    SmoothStep,
}

impl Easing {
    /// Map linear progress in [0, 1] onto the curve.
    pub fn apply(self, t: Fixed64) -> Fixed64 {
        match self {
            Easing::Linear => t.clamp(Fixed64::ZERO, Fixed64::ONE),
            Easing::SmoothStep => smooth_step(t),
        }
    }
}
