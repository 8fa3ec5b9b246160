//! Unified drag / inertia / idle-spin controller
//!
//! One scalar yaw is shared by the foliage, ornaments, and star. While the
//! input is down, horizontal motion drags the yaw directly; on release the
//! last drag delta decays as inertia, and once it dies out a slow idle spin
//! takes over.

use super::state::FrameInput;

/// Input coordinates are [-1, 1]; scaling widens the usable drag range
const COORD_SCALE: f32 = 5.0;
/// Radians of yaw per scaled-coordinate unit
const DRAG_SENSITIVITY: f32 = 1.5;
/// Per-frame inertia decay after release
const INERTIA_DECAY: f32 = 0.95;
/// Idle auto-rotation, radians per frame
const IDLE_SPIN: f32 = 0.002;
/// Inertia magnitude below which idle spin resumes
const IDLE_THRESHOLD: f32 = 0.001;

#[derive(Debug, Clone, Default)]
pub struct RotationController {
    rotation: f32,
    previous_x: f32,
    velocity: f32,
    dragging: bool,
}

impl RotationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame; returns the updated yaw
    pub fn update(&mut self, input: &FrameInput) -> f32 {
        let current = input.x * COORD_SCALE;

        if input.is_down {
            if self.dragging {
                let delta = (current - self.previous_x) * DRAG_SENSITIVITY;
                self.rotation += delta;
                self.velocity = delta;
                self.previous_x = current;
            } else {
                // First frame of a drag only captures the reference
                self.dragging = true;
                self.previous_x = current;
            }
        } else {
            self.dragging = false;
            self.rotation += self.velocity;
            self.velocity *= INERTIA_DECAY;

            if self.velocity.abs() < IDLE_THRESHOLD {
                self.rotation += IDLE_SPIN;
            }
        }

        self.rotation
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}
