//! Shared input state
//!
//! Two input sources feed the scene: ambient pointer coordinates plus a
//! pointer-down flag, and (optionally) hand-tracking coordinates with a
//! pinch flag. Writer discipline is one source per field: hand tracking is
//! the only writer of [`InteractionState`]'s coordinates, pointer events
//! touch only `is_down`, and pointer coordinates live in a separate
//! [`PointerState`]. Each frame both records are resolved into an immutable
//! [`FrameInput`] passed by reference to the systems that consume it.

/// Gesture-side input record
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionState {
    /// Hand cursor, normalized [-1, 1]; written only by hand tracking
    pub x: f32,
    /// Hand cursor, normalized [-1, 1]; written only by hand tracking
    pub y: f32,
    /// Pointer pressed or hand pinched
    pub is_down: bool,
    /// A hand is currently present in the tracker
    pub is_hand_detected: bool,
}

impl InteractionState {
    /// Pointer writer: only the down flag, never the coordinates
    pub fn set_down(&mut self, down: bool) {
        self.is_down = down;
    }

    /// Hand-tracking writer: owns every field while a hand is detected
    pub fn set_hand(&mut self, x: f32, y: f32, pinch: bool, detected: bool) {
        self.is_hand_detected = detected;
        if detected {
            self.x = x.clamp(-1.0, 1.0);
            self.y = y.clamp(-1.0, 1.0);
            self.is_down = pinch;
        }
    }

    /// Drop back to pointer input; called when the tracker shuts down
    pub fn clear_hand(&mut self) {
        self.is_hand_detected = false;
    }
}

/// Ambient pointer coordinates, normalized [-1, 1]
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    pub fn set(&mut self, x: f32, y: f32) {
        self.x = x.clamp(-1.0, 1.0);
        self.y = y.clamp(-1.0, 1.0);
    }
}

/// The arbitrated input for one frame: hand coordinates when a hand is
/// present, pointer coordinates otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub x: f32,
    pub y: f32,
    pub is_down: bool,
}

impl FrameInput {
    pub fn resolve(interaction: &InteractionState, pointer: &PointerState) -> Self {
        if interaction.is_hand_detected {
            Self {
                x: interaction.x,
                y: interaction.y,
                is_down: interaction.is_down,
            }
        } else {
            Self {
                x: pointer.x,
                y: pointer.y,
                is_down: interaction.is_down,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_is_default_source() {
        let interaction = InteractionState::default();
        let mut pointer = PointerState::default();
        pointer.set(0.4, -0.2);

        let input = FrameInput::resolve(&interaction, &pointer);
        assert_eq!(input.x, 0.4);
        assert_eq!(input.y, -0.2);
        assert!(!input.is_down);
    }

    #[test]
    fn test_hand_takes_priority_when_detected() {
        let mut interaction = InteractionState::default();
        let mut pointer = PointerState::default();
        pointer.set(0.9, 0.9);
        interaction.set_hand(-0.5, 0.1, true, true);

        let input = FrameInput::resolve(&interaction, &pointer);
        assert_eq!(input.x, -0.5);
        assert_eq!(input.y, 0.1);
        assert!(input.is_down);
    }

    #[test]
    fn test_lost_hand_reads_pointer_next_frame() {
        let mut interaction = InteractionState::default();
        let mut pointer = PointerState::default();
        pointer.set(0.25, 0.75);
        interaction.set_hand(-1.0, -1.0, false, true);

        interaction.clear_hand();
        let input = FrameInput::resolve(&interaction, &pointer);
        assert_eq!(input.x, 0.25);
        assert_eq!(input.y, 0.75);
    }

    #[test]
    fn test_undetected_hand_never_writes_coordinates() {
        let mut interaction = InteractionState::default();
        interaction.set_hand(0.8, 0.8, true, false);
        assert_eq!(interaction.x, 0.0);
        assert_eq!(interaction.y, 0.0);
        assert!(!interaction.is_down);
        assert!(!interaction.is_hand_detected);
    }

    #[test]
    fn test_pointer_down_does_not_touch_coordinates() {
        let mut interaction = InteractionState::default();
        interaction.set_hand(0.3, 0.3, false, true);
        interaction.set_down(true);
        assert_eq!(interaction.x, 0.3);
        assert!(interaction.is_down);
    }

    #[test]
    fn test_coordinates_clamped() {
        let mut pointer = PointerState::default();
        pointer.set(3.0, -9.0);
        assert_eq!(pointer.x, 1.0);
        assert_eq!(pointer.y, -1.0);
    }
}
