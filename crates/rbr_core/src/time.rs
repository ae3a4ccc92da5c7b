use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Variable-step frame clock.
///
/// The simulation integrates with the measured frame delta. Long frames
/// (debugger pauses, window drags) are capped at `max_frame_dt` so a single
/// step cannot tunnel entities through tiles.
pub struct TimeState {
    pub max_frame_dt: f32,
    pub frame_dt: f32,
    pub total_time: f64,
    pub frame_count: u64,
    last_instant: Instant,

    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f32,
    pub smoothed_frame_time_ms: f32,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            max_frame_dt: 0.25,
            frame_dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure wall-clock time since the previous frame.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.begin_frame_with(real_dt)
    }

    /// Start a frame with an externally supplied delta (replays, tests).
    pub fn begin_frame_with(&mut self, real_dt: f32) -> f32 {
        let mut dt = real_dt.max(0.0);
        if dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.1}ms",
                dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            dt = self.max_frame_dt;
        }

        self.frame_dt = dt;
        self.total_time += f64::from(dt);
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt = self.fps_samples.iter().sum::<f32>() / FPS_SAMPLE_COUNT as f32;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        dt
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_delta_accumulates() {
        let mut time = TimeState::new();
        for _ in 0..4 {
            time.begin_frame_with(0.25);
        }
        assert_eq!(time.frame_count, 4);
        assert!((time.total_time - 1.0).abs() < 1e-6);
        assert!((time.frame_dt - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut time = TimeState::new();
        let dt = time.begin_frame_with(3.0);
        assert!((dt - time.max_frame_dt).abs() < f32::EPSILON);
    }

    #[test]
    fn negative_delta_is_treated_as_zero() {
        let mut time = TimeState::new();
        assert_eq!(time.begin_frame_with(-0.5), 0.0);
    }

    #[test]
    fn fps_converges_to_steady_rate() {
        let mut time = TimeState::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            time.begin_frame_with(1.0 / 30.0);
        }
        assert!((time.smoothed_fps - 30.0).abs() < 0.01);
        assert!((time.smoothed_frame_time_ms - 33.333).abs() < 0.01);
    }
}
