//! Animation primitives for the chaos/form morph
//!
//! Easing curves plus the damped progress scalar every particle group
//! advances once per frame.

pub mod easing;
pub mod progress;

pub use easing::{cubic_in_out, ease, Easing};
pub use progress::{damp, ProgressDriver};
