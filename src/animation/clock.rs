use web_time::Instant;

/// Measures the wall-clock time elapsed between frames.
#[derive(Clone, Debug)]
pub struct Clock {
    start: Instant,
    last: Instant,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Seconds elapsed since the previous call, or since the clock was created
    /// for the first call.
    pub fn get_delta(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        delta
    }

    /// Seconds elapsed since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_non_negative_and_bounded_by_elapsed() {
        let mut clock = Clock::new();
        let a = clock.get_delta();
        let b = clock.get_delta();
        assert!(a >= 0.0 && b >= 0.0);
        assert!(a + b <= clock.elapsed() + 1.0e-3);
    }
}
