pub const FPS_SAMPLE_CAPACITY: usize = 1000;

/// Rolling window of instantaneous frame rates (`1000 / delta_ms`), oldest evicted
/// first once full.
#[derive(Debug, Clone)]
pub struct FpsSampler {
    samples: Box<[f32]>,
    head: usize,
    count: usize,
    sum: f64,
}

impl Default for FpsSampler {
    fn default() -> Self {
        Self::with_capacity(FPS_SAMPLE_CAPACITY)
    }
}

impl FpsSampler {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity.max(1)].into_boxed_slice(),
            head: 0,
            count: 0,
            sum: 0.0,
        }
    }

    /// Non-positive or non-finite deltas are ignored.
    pub fn record_delta_ms(&mut self, delta_ms: f32) {
        if !(delta_ms.is_finite() && delta_ms > 0.0) {
            return;
        }
        let fps = 1000.0 / delta_ms;
        let capacity = self.samples.len();

        if self.count < capacity {
            self.count += 1;
        } else {
            self.sum -= self.samples[self.head] as f64;
        }
        self.samples[self.head] = fps;
        self.sum += fps as f64;
        self.head = (self.head + 1) % capacity;
    }

    pub fn mean_fps(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum / self.count as f64) as f32
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }
}
