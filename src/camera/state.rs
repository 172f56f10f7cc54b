//! Camera state

use crate::rasterizer::{degrees_to_radians, heading_vector, Vec2};

/// Offset between the stored rotation and the direction the view faces
const HEADING_OFFSET: f32 = 90.0;

/// Camera position and heading in texture space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Position in source-texture pixels
    pub origin: Vec2,
    /// Heading in degrees, kept in [0, 360)
    pub rotation: f32,
    /// Unit vector along the heading, refreshed every tick
    pub heading: Vec2,
}

impl CameraState {
    pub fn new(origin: Vec2, rotation: f32) -> Self {
        let mut cam = Self {
            origin,
            rotation: 0.0,
            heading: Vec2::ZERO,
        };
        cam.set_rotation(rotation);
        cam
    }

    /// Place the camera for a freshly loaded map: explicit origin or the map center
    pub fn reset_for_texture(&mut self, size: (f32, f32), origin: Option<Vec2>, rotation: Option<f32>) {
        self.origin = origin.unwrap_or(Vec2::new(size.0 / 2.0, size.1 / 2.0));
        if let Some(rotation) = rotation {
            self.set_rotation(rotation);
        }
    }

    /// Set rotation (any value, folded into [0, 360))
    pub fn set_rotation(&mut self, degrees: f32) {
        let r = degrees.rem_euclid(360.0);
        self.rotation = if r >= 360.0 { 0.0 } else { r };
        self.update_heading();
    }

    /// Turn by a bounded per-tick delta, wrapping once
    pub fn rotate(&mut self, delta: f32) {
        self.rotation += delta;
        if self.rotation < 0.0 {
            self.rotation += 360.0;
        }
        if self.rotation >= 360.0 {
            self.rotation -= 360.0;
        }
        self.update_heading();
    }

    pub fn update_heading(&mut self) {
        self.heading = heading_vector(degrees_to_radians(self.rotation + HEADING_OFFSET));
    }

    /// Move along the heading vector (negative = towards the far edge)
    pub fn translate(&mut self, amount: f32) {
        if amount != 0.0 {
            self.origin = self.origin + self.heading * amount;
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_wraps_into_range() {
        let mut cam = CameraState::default();
        cam.rotate(-3.0);
        assert!((cam.rotation - 357.0).abs() < 0.001);
        cam.rotate(5.0);
        assert!((cam.rotation - 2.0).abs() < 0.001);

        for start in [0.0, 0.5, 180.0, 359.9] {
            for delta in [-45.0, -0.1, 0.0, 0.1, 45.0, 359.0] {
                let mut cam = CameraState::new(Vec2::ZERO, start);
                cam.rotate(delta);
                assert!(cam.rotation >= 0.0 && cam.rotation < 360.0, "{} + {}", start, delta);
            }
        }
    }

    #[test]
    fn test_rotate_exactly_full_turn() {
        let mut cam = CameraState::new(Vec2::ZERO, 350.0);
        cam.rotate(10.0);
        assert_eq!(cam.rotation, 0.0);
    }

    #[test]
    fn test_heading_faces_down_texture_at_zero() {
        let cam = CameraState::default();
        assert!(cam.heading.x.abs() < 0.0001);
        assert!((cam.heading.y - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_translate_negative_moves_towards_far_edge() {
        let mut cam = CameraState::new(Vec2::new(100.0, 100.0), 0.0);
        cam.translate(-10.0);
        assert!((cam.origin.y - 90.0).abs() < 0.001);
        assert!((cam.origin.x - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_reset_for_texture() {
        let mut cam = CameraState::new(Vec2::new(1.0, 1.0), 45.0);
        cam.reset_for_texture((200.0, 100.0), None, None);
        assert_eq!(cam.origin, Vec2::new(100.0, 50.0));
        assert_eq!(cam.rotation, 45.0);

        cam.reset_for_texture((200.0, 100.0), Some(Vec2::new(3.0, 4.0)), Some(-90.0));
        assert_eq!(cam.origin, Vec2::new(3.0, 4.0));
        assert_eq!(cam.rotation, 270.0);
    }
}
