use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub substeps_per_frame: f32,
    pub frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    pub clamped_frames: u32,
}

/// Aggregates per-frame loop timings over a fixed reporting interval.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    substeps: u32,
    clamped_frames: u32,
    frame_time_sum: Duration,
    frame_time_max: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            frames: 0,
            substeps: 0,
            clamped_frames: 0,
            frame_time_sum: Duration::ZERO,
            frame_time_max: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, substeps: u32, was_clamped: bool) {
        self.frames = self.frames.saturating_add(1);
        self.substeps = self.substeps.saturating_add(substeps);
        if was_clamped {
            self.clamped_frames = self.clamped_frames.saturating_add(1);
        }
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        self.frame_time_max = self.frame_time_max.max(frame_dt);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let (frame_time_ms, substeps_per_frame) = if self.frames == 0 {
            (0.0, 0.0)
        } else {
            (
                self.frame_time_sum.as_secs_f32() * 1000.0 / self.frames as f32,
                self.substeps as f32 / self.frames as f32,
            )
        };

        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            substeps_per_frame,
            frame_time_ms,
            max_frame_time_ms: self.frame_time_max.as_secs_f32() * 1000.0,
            clamped_frames: self.clamped_frames,
        };

        *self = Self::new(self.interval, now);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_computes_expected_values() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);

        accumulator.record_frame(Duration::from_millis(16), 1, false);
        accumulator.record_frame(Duration::from_millis(120), 3, true);

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert!((snapshot.fps - 2.0).abs() < 0.05);
        assert!((snapshot.substeps_per_frame - 2.0).abs() < 0.001);
        assert!((snapshot.frame_time_ms - 68.0).abs() < 0.01);
        assert!((snapshot.max_frame_time_ms - 120.0).abs() < 0.01);
        assert_eq!(snapshot.clamped_frames, 1);
    }

    #[test]
    fn snapshot_not_emitted_before_interval() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);
        accumulator.record_frame(Duration::from_millis(16), 1, false);

        assert!(accumulator
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn snapshot_resets_the_interval() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);
        accumulator.record_frame(Duration::from_millis(16), 1, true);
        let first = base + Duration::from_secs(1);
        assert!(accumulator.maybe_snapshot(first).is_some());

        let second = accumulator
            .maybe_snapshot(first + Duration::from_secs(1))
            .expect("second snapshot");
        assert_eq!(second.fps, 0.0);
        assert_eq!(second.clamped_frames, 0);
    }
}
