use std::time::{Duration, Instant};

/// Monotonic elapsed-time counter, started on creation and never reset.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed seconds as fed to the animation step.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let clock = Clock::start();
        let first = clock.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        let second = clock.elapsed();

        assert!(second > first);
        assert!(clock.elapsed_secs() >= second.as_secs_f32());
    }
}
