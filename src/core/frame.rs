//! Cooperative frame gate with a rolling FPS average.
//!
//! The scheduler never blocks: it only tells the caller whether the heavy
//! parts of a tick (culling, particle updates, spawn scans) should run.

use super::constants::*;
use crate::spatial::SpatialIndex;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    target_fps: f64,
    target_frame_ms: f64,
    last_frame_ms: Option<f64>,
    last_delta_ms: f64,
    frame_count: u64,
    sample_start_ms: Option<f64>,
    sample_frames: u32,
    fps_history: VecDeque<f64>,
    average_fps: f64,
    throttling: bool,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::with_target(TARGET_FPS, TARGET_FRAME_MS)
    }

    pub fn with_target_fps(target_fps: f64) -> Self {
        Self::with_target(target_fps, 1000.0 / target_fps)
    }

    fn with_target(target_fps: f64, target_frame_ms: f64) -> Self {
        Self {
            target_fps,
            target_frame_ms,
            last_frame_ms: None,
            last_delta_ms: 0.0,
            frame_count: 0,
            sample_start_ms: None,
            sample_frames: 0,
            fps_history: VecDeque::with_capacity(FPS_HISTORY_LEN + 1),
            average_fps: target_fps,
            throttling: false,
        }
    }

    /// Registers a new frame at `now_ms` and returns whether expensive work
    /// may run this tick.
    pub fn start_frame(&mut self, now_ms: f64) -> bool {
        let Some(last) = self.last_frame_ms else {
            self.last_frame_ms = Some(now_ms);
            self.sample_start_ms = Some(now_ms);
            self.frame_count = 1;
            self.sample_frames = 1;
            return true;
        };

        let delta = (now_ms - last).max(0.0);
        self.last_delta_ms = delta;
        self.last_frame_ms = Some(now_ms);
        self.frame_count += 1;
        self.sample_frames += 1;
        self.sample_fps(now_ms);

        if delta < self.target_frame_ms {
            return false;
        }
        !(self.throttling && self.frame_count % 2 == 1)
    }

    fn sample_fps(&mut self, now_ms: f64) {
        let start = self.sample_start_ms.unwrap_or(now_ms);
        let elapsed = now_ms - start;
        if elapsed < FPS_SAMPLE_INTERVAL_MS {
            return;
        }

        let fps = self.sample_frames as f64 * 1000.0 / elapsed;
        self.fps_history.push_back(fps);
        while self.fps_history.len() > FPS_HISTORY_LEN {
            self.fps_history.pop_front();
        }
        self.average_fps = self.fps_history.iter().sum::<f64>() / self.fps_history.len() as f64;
        self.sample_start_ms = Some(now_ms);
        self.sample_frames = 0;

        let throttling = self.average_fps < self.target_fps - FPS_THROTTLE_MARGIN;
        if throttling != self.throttling {
            tracing::trace!(average_fps = self.average_fps, throttling, "frame throttle changed");
        }
        self.throttling = throttling;
    }

    /// Trims FPS history and purges empty spatial buckets.
    pub fn cleanup(&mut self, spatial: &mut SpatialIndex) {
        while self.fps_history.len() > FPS_HISTORY_LEN {
            self.fps_history.pop_front();
        }
        spatial.cleanup();
    }

    pub fn is_throttling(&self) -> bool {
        self.throttling
    }

    pub fn average_fps(&self) -> f64 {
        self.average_fps
    }

    pub fn last_delta_ms(&self) -> f64 {
        self.last_delta_ms
    }

    pub fn fps_history_len(&self) -> usize {
        self.fps_history.len()
    }

    pub fn target_frame_ms(&self) -> f64 {
        self.target_frame_ms
    }
}
