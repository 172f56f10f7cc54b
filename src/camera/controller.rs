//! Held-key camera controller
//!
//! Input events only flip bits in a [`HeldInputs`] set; the controller reads
//! the set once per tick, so the order of events inside a tick is irrelevant.

use super::state::CameraState;

/// Degrees (rotation) or pixels (translation) per decisecond
pub const TURN_SPEED: f32 = 5.0;
pub const MOVE_SPEED: f32 = 5.0;
/// Multiplier applied while the speed boost is held
pub const BOOST_FACTOR: f32 = 4.0;

/// Camera actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    RotateLeft = 0,
    RotateRight = 1,
    Forward = 2,
    Backward = 3,
    SpeedBoost = 4,
}

impl InputAction {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of currently held actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldInputs(u8);

impl HeldInputs {
    pub const NONE: HeldInputs = HeldInputs(0);

    pub fn press(&mut self, action: InputAction) {
        self.0 |= action.bit();
    }

    pub fn release(&mut self, action: InputAction) {
        self.0 &= !action.bit();
    }

    pub fn is_held(self, action: InputAction) -> bool {
        self.0 & action.bit() != 0
    }
}

impl FromIterator<InputAction> for HeldInputs {
    fn from_iter<I: IntoIterator<Item = InputAction>>(iter: I) -> Self {
        let mut held = HeldInputs::NONE;
        for action in iter {
            held.press(action);
        }
        held
    }
}

/// Advance the camera by one tick. `dt` is in deciseconds.
pub fn advance_camera(camera: &mut CameraState, held: HeldInputs, dt: f32) {
    // Turning
    let mut turn = 0.0;
    if held.is_held(InputAction::RotateLeft) {
        turn -= dt * TURN_SPEED;
    }
    if held.is_held(InputAction::RotateRight) {
        turn += dt * TURN_SPEED;
    }
    camera.rotate(turn);

    // Forward is against the heading vector, towards the far edge
    let mut translate = 0.0;
    if held.is_held(InputAction::Forward) {
        translate -= dt * MOVE_SPEED;
    }
    if held.is_held(InputAction::Backward) {
        translate += dt * MOVE_SPEED;
    }
    if held.is_held(InputAction::SpeedBoost) {
        translate *= BOOST_FACTOR;
    }
    camera.translate(translate);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Vec2;

    const ALL: [InputAction; 5] = [
        InputAction::RotateLeft,
        InputAction::RotateRight,
        InputAction::Forward,
        InputAction::Backward,
        InputAction::SpeedBoost,
    ];

    #[test]
    fn test_held_inputs_bitset() {
        let mut held = HeldInputs::NONE;
        held.press(InputAction::Forward);
        held.press(InputAction::SpeedBoost);
        assert!(held.is_held(InputAction::Forward));
        assert!(!held.is_held(InputAction::Backward));
        held.release(InputAction::Forward);
        assert!(!held.is_held(InputAction::Forward));
        held.release(InputAction::SpeedBoost);
        assert_eq!(held, HeldInputs::NONE);

        let all: HeldInputs = ALL.into_iter().collect();
        assert!(ALL.iter().all(|a| all.is_held(*a)));
    }

    #[test]
    fn test_rotation_per_tick() {
        let mut cam = CameraState::new(Vec2::ZERO, 10.0);
        let held: HeldInputs = [InputAction::RotateRight].into_iter().collect();
        advance_camera(&mut cam, held, 0.5);
        assert!((cam.rotation - 12.5).abs() < 0.001);

        let held: HeldInputs = [InputAction::RotateLeft].into_iter().collect();
        advance_camera(&mut cam, held, 3.0);
        assert!((cam.rotation - 357.5).abs() < 0.001);
    }

    #[test]
    fn test_opposite_inputs_cancel() {
        let mut cam = CameraState::new(Vec2::new(5.0, 5.0), 30.0);
        let held: HeldInputs = ALL.into_iter().collect();
        advance_camera(&mut cam, held, 1.0);
        assert!((cam.rotation - 30.0).abs() < 0.001);
        assert_eq!(cam.origin, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_forward_and_boost() {
        let mut cam = CameraState::new(Vec2::new(50.0, 50.0), 0.0);
        let held: HeldInputs = [InputAction::Forward].into_iter().collect();
        advance_camera(&mut cam, held, 1.0);
        assert!((cam.origin.y - 45.0).abs() < 0.001);

        let held: HeldInputs = [InputAction::Backward, InputAction::SpeedBoost].into_iter().collect();
        advance_camera(&mut cam, held, 1.0);
        assert!((cam.origin.y - 65.0).abs() < 0.001);
        assert!((cam.origin.x - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_heading_follows_rotation() {
        let mut cam = CameraState::new(Vec2::new(0.0, 0.0), 0.0);
        let held: HeldInputs = [InputAction::RotateRight].into_iter().collect();
        // 18 deciseconds at 5 deg/ds = 90 degrees
        advance_camera(&mut cam, held, 18.0);
        assert!((cam.rotation - 90.0).abs() < 0.001);
        // rotation + 90 = 180 degrees: heading points to -x
        assert!((cam.heading.x + 1.0).abs() < 0.001);
    }
}
