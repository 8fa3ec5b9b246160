//! Input state and the unified rotation controller

pub mod rotation;
pub mod state;

pub use rotation::RotationController;
pub use state::{FrameInput, InteractionState, PointerState};
