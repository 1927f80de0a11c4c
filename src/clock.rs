use tokio::time::Instant;

/// Source of the millisecond timestamps that detectors work with. Only differences between
///  timestamps matter, so any consistent clock will do.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// A monotonic [Clock] counting milliseconds since its creation. It is based on tokio's
///  [Instant], so it follows tokio's paused and manually advanced time in tests.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> TokioClock {
        TokioClock {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        TokioClock::new()
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis()
            .try_into()
            .unwrap_or(u64::MAX)
    }
}
