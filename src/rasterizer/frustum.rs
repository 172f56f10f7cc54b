//! Camera frustum in texture space
//!
//! The frustum is a trapezoid on the ground plane. Its near edge sits on the
//! camera origin row, its far edge is pushed "up" the texture by the frustum
//! depth, and the whole shape is rotated about the origin by the heading.

use super::math::{degrees_to_radians, rotate_about, Vec2};

/// Shape parameters for the frustum (unitless fractions of the texture size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumShape {
    pub scale: f32,
    pub near_width: f32,
    pub far_width: f32,
    pub depth: f32,
}

/// Four corners in fixed order: far-left, far-right, near-right, near-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frustum {
    pub corners: [Vec2; 4],
}

impl Frustum {
    pub const FAR_LEFT: usize = 0;
    pub const FAR_RIGHT: usize = 1;
    pub const NEAR_RIGHT: usize = 2;
    pub const NEAR_LEFT: usize = 3;

    pub fn far_left(&self) -> Vec2 {
        self.corners[Self::FAR_LEFT]
    }

    pub fn far_right(&self) -> Vec2 {
        self.corners[Self::FAR_RIGHT]
    }

    pub fn near_right(&self) -> Vec2 {
        self.corners[Self::NEAR_RIGHT]
    }

    pub fn near_left(&self) -> Vec2 {
        self.corners[Self::NEAR_LEFT]
    }

    /// Outline edges as (from, to) pairs, closing back to the first corner
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let c = self.corners;
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }
}

/// Compute the unrotated frustum for a camera at `origin`.
///
/// `texture_size` is `None` when no map is loaded, giving a degenerate
/// frustum at (0, 0). A `scale` below 1 maps the frustum onto a scaled-down
/// copy of the texture (the preview), scaling about the texture midpoint.
pub fn compute_frustum(
    origin: Vec2,
    texture_size: Option<(f32, f32)>,
    scale: f32,
    shape: &FrustumShape,
) -> Frustum {
    let Some((mut width, mut height)) = texture_size else {
        return Frustum::default();
    };

    let mut x = origin.x;
    let mut y = origin.y;
    if scale < 1.0 {
        x = (x - width / 2.0) * scale;
        y = (y - height / 2.0) * scale;
        width *= scale;
        height *= scale;
        x += width / 2.0;
        y += height / 2.0;
    }

    let span_x = width * shape.scale;
    let span_y = height * shape.scale;
    let far_y = y - span_y * shape.depth;

    Frustum {
        corners: [
            Vec2::new(x - span_x * shape.far_width, far_y),
            Vec2::new(x + span_x * shape.far_width, far_y),
            Vec2::new(x + (span_x / 2.0) * shape.near_width, y),
            Vec2::new(x - (span_x / 2.0) * shape.near_width, y),
        ],
    }
}

/// Rotate every corner about `origin` by `rotation` degrees
pub fn rotate_frustum(frustum: &Frustum, origin: Vec2, rotation: f32) -> Frustum {
    if rotation == 0.0 {
        return *frustum;
    }

    let rad = degrees_to_radians(rotation);
    Frustum {
        corners: frustum.corners.map(|p| rotate_about(p, origin, rad)),
    }
}
