//! Frame clock: real frame delta plus a pausable, scalable scene time.
//!
//! The clock is the only place wall-clock time is read. Everything else
//! receives a [`FrameTime`] by value.

use std::time::Instant;

use tracing::{debug, warn};

/// Longest frame delta accepted, in seconds. Longer frames (a breakpoint,
/// a dragged window) are clamped so the camera and bodies do not jump.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Times handed to one frame update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Real seconds since the previous frame, clamped. Drives camera input.
    pub delta: f32,
    /// Scene seconds elapsed since start. Drives body motion and orbiting.
    pub scene_time: f32,
    /// Scene seconds added this frame (0 while paused).
    pub scene_delta: f32,
}

/// Measures frame deltas and accumulates scene time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    previous: Option<Instant>,
    scene_time: f64,
    time_scale: f64,
    paused: bool,
    frame_count: u64,
}

impl FrameClock {
    /// A clock at scene time 0.
    pub fn new(time_scale: f64, paused: bool) -> Self {
        Self {
            previous: None,
            scene_time: 0.0,
            time_scale,
            paused,
            frame_count: 0,
        }
    }

    /// Measures the time since the last tick and advances. The first tick
    /// has a zero delta.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let elapsed = self
            .previous
            .map_or(0.0, |prev| now.duration_since(prev).as_secs_f64());
        self.previous = Some(now);
        self.advance(elapsed)
    }

    /// Advances by an explicit real frame time in seconds.
    pub fn advance(&mut self, frame_time: f64) -> FrameTime {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        let scene_delta = if self.paused {
            0.0
        } else {
            frame_time * self.time_scale
        };
        self.scene_time += scene_delta;
        self.frame_count += 1;

        FrameTime {
            delta: frame_time as f32,
            scene_time: self.scene_time as f32,
            scene_delta: scene_delta as f32,
        }
    }

    /// Freezes or resumes scene time.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            debug!("Scene time {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Flips the paused state and returns the new one.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Scene seconds per real second.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Sets the scene seconds per real second. Negative values run time
    /// backwards.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale;
    }

    /// Scene seconds since start.
    pub fn scene_time(&self) -> f64 {
        self.scene_time
    }

    /// Frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_time_accumulates() {
        let mut clock = FrameClock::default();
        for _ in 0..10 {
            clock.advance(0.016);
        }
        assert!((clock.scene_time() - 0.16).abs() < 1e-9);
        assert_eq!(clock.frame_count(), 10);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = FrameClock::default();
        let t = clock.advance(3.0);
        assert_eq!(t.delta, MAX_FRAME_TIME as f32);
        assert!((clock.scene_time() - MAX_FRAME_TIME).abs() < 1e-12);
    }

    #[test]
    fn test_negative_frame_time_is_zero() {
        let mut clock = FrameClock::default();
        let t = clock.advance(-1.0);
        assert_eq!(t.delta, 0.0);
        assert_eq!(clock.scene_time(), 0.0);
    }

    #[test]
    fn test_pause_freezes_scene_time_only() {
        let mut clock = FrameClock::default();
        clock.advance(0.1);
        assert!(clock.toggle_pause());
        let t = clock.advance(0.1);
        assert!((t.delta - 0.1).abs() < 1e-6);
        assert_eq!(t.scene_delta, 0.0);
        assert!((clock.scene_time() - 0.1).abs() < 1e-12);

        assert!(!clock.toggle_pause());
        clock.advance(0.1);
        assert!((clock.scene_time() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_time_scale_multiplies_scene_time() {
        let mut clock = FrameClock::new(10.0, false);
        let t = clock.advance(0.05);
        assert!((t.scene_delta - 0.5).abs() < 1e-6);
        assert!((t.delta - 0.05).abs() < 1e-6);

        clock.set_time_scale(-1.0);
        clock.advance(0.25);
        assert!((clock.scene_time() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_start_paused() {
        let mut clock = FrameClock::new(1.0, true);
        clock.advance(0.2);
        assert!(clock.is_paused());
        assert_eq!(clock.scene_time(), 0.0);
    }

    #[test]
    fn test_deterministic_sequence() {
        let frame_times = [0.017, 0.015, 0.020, 0.016, 0.033, 0.008, 0.018];
        let mut a = FrameClock::new(2.0, false);
        let mut b = FrameClock::new(2.0, false);
        for &ft in &frame_times {
            assert_eq!(a.advance(ft), b.advance(ft));
        }
    }

    #[test]
    fn test_first_tick_has_zero_delta() {
        let mut clock = FrameClock::default();
        let t = clock.tick();
        assert_eq!(t.delta, 0.0);
        assert_eq!(clock.frame_count(), 1);
    }
}
