//! Programmatic evaluation of rendered output
//!
//! Readback-based metrics for verifying the bloom chain and the scene
//! palette from an automated harness.

pub mod metrics;

pub use metrics::{analyze_frame, FrameAnalyzer, FrameCriteria, FrameMetrics};
