use log::debug;
use std::time::{Duration, Instant};

pub struct FPSLimiter {
    last_tick: Instant,
}

impl FPSLimiter {
    pub fn wait(&mut self, desired_delta_time: Duration) {
        puffin::profile_function!();
        let wait_until = self.last_tick + desired_delta_time;
        if let Some(sleep_duration) = wait_until.checked_duration_since(Instant::now()) {
            std::thread::sleep(sleep_duration);
        }
        self.last_tick = Instant::now();
    }
}

impl Default for FPSLimiter {
    fn default() -> Self {
        FPSLimiter { last_tick: Instant::now() }
    }
}

/// Counts frames and reports the average frame time once per interval.
pub struct FrameTimer {
    interval: Duration,
    window_start: Instant,
    frames: u32,
}

impl FrameTimer {
    pub fn new(interval: Duration) -> FrameTimer {
        FrameTimer::starting_at(interval, Instant::now())
    }

    pub fn starting_at(interval: Duration, now: Instant) -> FrameTimer {
        FrameTimer {
            interval,
            window_start: now,
            frames: 0,
        }
    }

    /// Counts one frame and logs the ms/frame when an interval has passed.
    pub fn tick(&mut self) {
        if let Some(ms) = self.tick_at(Instant::now()) {
            debug!("{:.3} ms/frame", ms);
        }
    }

    /// Returns the average milliseconds per frame whenever a full interval has elapsed at `now`.
    pub fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let ms_per_frame = elapsed.as_secs_f64() * 1000.0 / self.frames as f64;
        self.frames = 0;
        self.window_start = now;
        Some(ms_per_frame)
    }
}
