//! Frame clock with an optional fixed-timestep accumulator

use std::time::Instant;

/// Tracks scene time and frame count.
///
/// By default every frame is one simulation tick (the display refresh drives
/// the loop). With `with_fixed_rate` the accumulator hands out a constant
/// number of ticks per second instead.
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Fixed tick interval, if running at a fixed rate
    pub fixed_timestep: Option<f64>,
    /// Number of frames advanced so far
    pub frame_count: u64,
    accumulator: f64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: None,
            frame_count: 0,
            accumulator: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    /// Clock that ticks once per frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that produces `hz` ticks per second regardless of refresh rate
    pub fn with_fixed_rate(hz: f64) -> Self {
        Self {
            fixed_timestep: Some(1.0 / hz.max(1.0)),
            ..Self::default()
        }
    }

    /// Advance the clock from the wall clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            self.frame_count += 1;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance by an explicit duration (headless runs, tests)
    pub fn advance(&mut self, seconds: f64) {
        // Clamp to avoid spiral of death (max 250ms frame time)
        self.delta_time = seconds.clamp(0.0, 0.25);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
        self.frame_count += 1;
    }

    /// Number of simulation ticks owed this frame, consuming them.
    ///
    /// Always 1 without a fixed rate.
    pub fn take_ticks(&mut self) -> u32 {
        let Some(step) = self.fixed_timestep else {
            return 1;
        };
        let mut ticks = 0;
        while self.accumulator >= step {
            self.accumulator -= step;
            ticks += 1;
        }
        ticks
    }

    /// Elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.total_time * 1000.0
    }
}
