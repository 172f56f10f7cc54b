//! 2D math for texture-space geometry

use std::ops::{Add, Div, Mul, Sub};
use serde::{Deserialize, Serialize};

/// Fallback divisor when a perspective factor is not finite
const NON_FINITE_FACTOR: f32 = 0.1;

/// 2D point / vector in source-texture pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn len(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).len()
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        self.scale(s)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x / s,
            y: self.y / s,
        }
    }
}

/// Convert degrees to radians
pub fn degrees_to_radians(deg: f32) -> f32 {
    deg * (std::f32::consts::PI / 180.0)
}

/// Unit heading vector (cos, sin) for a rotation in radians
pub fn heading_vector(rad: f32) -> Vec2 {
    let (s, c) = rad.sin_cos();
    Vec2::new(c, s)
}

/// Point between `a` and `b` at factor `t`.
///
/// `t == 0` yields `a` and `t == 1` yields `b` exactly in both modes.
/// With `perspective` set the blend is `(a - b) / t + b`, the reciprocal
/// form used along the depth axis: small `t` pushes the point towards the
/// horizon, so near scanlines advance faster across the texture than far ones.
pub fn interpolate(a: Vec2, b: Vec2, t: f32, perspective: bool) -> Vec2 {
    if t == 0.0 {
        return a;
    }
    if t == 1.0 {
        return b;
    }

    if perspective {
        let p = if t.is_finite() { t } else { NON_FINITE_FACTOR };
        (a - b) / p + b
    } else {
        a + (b - a) * t
    }
}

/// Rotate `p` about `origin` by `rad` (standard 2D rotation)
pub fn rotate_about(p: Vec2, origin: Vec2, rad: f32) -> Vec2 {
    let (s, c) = rad.sin_cos();
    let d = p - origin;
    Vec2 {
        x: d.x * c - d.y * s + origin.x,
        y: d.x * s + d.y * c + origin.y,
    }
}

/// Fold a texture coordinate into `[0, size)`
pub fn wrap_coord(v: f32, size: f32) -> f32 {
    let r = v.rem_euclid(size);
    // rem_euclid can round up to `size` for tiny negative inputs
    if r >= size {
        0.0
    } else {
        r
    }
}
