//! Wave engine
//!
//! Curve generation, arc-length resampling, phase integration, frame
//! rendering and the animation driver that ties them together. Nothing in
//! here touches the terminal directly; drawing goes through [`render::Canvas`]
//! and frame timing through [`scheduler::FrameScheduler`].

pub mod driver;
pub mod geometry;
pub mod phase;
pub mod render;
pub mod resample;
pub mod scheduler;

#[cfg(test)]
pub mod recording;
