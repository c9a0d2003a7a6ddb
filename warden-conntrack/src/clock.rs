use std::time::Instant;

/// A monotonic second-granularity tick source. The original module keyed
/// timeouts off `jiffies`; we key them off wall-clock seconds since the
/// table was created, which is what `last_seen` and the reaper's idle
/// threshold are both expressed in (§4.8).
#[derive(Debug)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Clock {
            start: Instant::now(),
        }
    }

    pub fn now(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new()
    }
}
