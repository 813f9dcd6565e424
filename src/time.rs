//! Frame-rate sampling and the pause flag for the viewer.
//!
//! Simulated time never comes from here: every step advances by
//! [`SimConfig::timestep`](crate::SimConfig::timestep) no matter how long the
//! frame took on screen.

use std::time::{Duration, Instant};

const SAMPLE_WINDOW: Duration = Duration::from_millis(500);

/// Counts redraws and turns them into a frames-per-second figure once per
/// sample window.
#[derive(Debug)]
pub struct FrameClock {
    window_start: Instant,
    window_frames: u32,
    window: Duration,
    fps: f32,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_window(SAMPLE_WINDOW)
    }

    fn with_window(window: Duration) -> Self {
        Self {
            window_start: Instant::now(),
            window_frames: 0,
            window,
            fps: 0.0,
            paused: false,
        }
    }

    /// Record one redraw. Returns `true` when a new FPS sample was taken.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> bool {
        self.window_frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return false;
        }
        self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
        self.window_frames = 0;
        self.window_start = now;
        true
    }

    /// Latest sample; zero until the first window closes.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
