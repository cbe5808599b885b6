//! Engine-wide plumbing: constants, config, timers, frame pacing and the world loop.

pub mod config;
pub mod constants;
pub mod events;
pub mod frame;
pub mod timers;
pub mod world;

/// World-space vector; one unit is one pixel of the tile map.
pub type Vec2 = vek::Vec2<f32>;
