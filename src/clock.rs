use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame timing: the delta since the previous tick, plus a one-second
/// sliding window for an FPS figure.
pub struct FrameClock {
    frames: VecDeque<Instant>,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::default(),
            last: Instant::now(),
        }
    }

    /// Advances the clock and returns the time since the previous tick.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last);
        self.last = now;

        self.frames.push_back(now);
        let cutoff = now - Duration::from_secs(1);
        while self.frames.front().map_or(false, |t| *t < cutoff) {
            self.frames.pop_front();
        }

        delta
    }

    /// Frames seen in the last second.
    #[cfg(feature = "fps")]
    pub fn fps(&self) -> usize {
        self.frames.len()
    }
}
