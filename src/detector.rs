use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace, warn};
use crate::clock::Clock;
use crate::config::DetectorConfig;
use crate::error::PhiError;
use crate::phi::{ExponentialPhi, PhiModel};
use crate::window::{SampleWindow, WindowStats};


/// A failure detector as described in "The Phi Accrual Failure Detector" (Hayashibara et al.,
///  2004), for a single monitored process.
///
/// Rather than deciding whether a process is alive, the detector reports a suspicion level phi
///  based on the time since the most recent heartbeat and the history of intervals between
///  heartbeats. It is up to the application to pick a threshold for phi, trading off the risk of
///  false positives against the time it takes to detect an actual failure.
///
/// All timestamps are in milliseconds of some clock that is consistent across calls.
///
/// The detector is meant to be shared between threads: typically heartbeats are recorded by the
///  code receiving them while phi is polled elsewhere. The sample window and the timestamp of the
///  most recent heartbeat are guarded by a single lock, so every phi calculation is based on a
///  window and a timestamp that belong together.
pub struct FailureDetector<P: PhiModel = ExponentialPhi> {
    state: Mutex<DetectorState>,
    min_samples: usize,
    model: P,
}

struct DetectorState {
    window: SampleWindow,
    /// `None` until the first heartbeat is recorded
    latest_heartbeat: Option<u64>,
}

/// A consistent view of a detector's state, i.e. the timestamp and the window statistics were
///  captured in the same critical section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorSnapshot {
    pub latest_heartbeat: Option<u64>,
    pub stats: WindowStats,
}

impl FailureDetector {
    /// Create a detector assuming exponentially distributed heartbeat intervals.
    pub fn new(window_size: usize, min_samples: usize) -> anyhow::Result<FailureDetector> {
        FailureDetector::from_config(&DetectorConfig::new(window_size, min_samples))
    }

    pub fn from_config(config: &DetectorConfig) -> anyhow::Result<FailureDetector> {
        FailureDetector::with_model(config, ExponentialPhi)
    }
}

impl<P: PhiModel> FailureDetector<P> {
    pub fn with_model(config: &DetectorConfig, model: P) -> anyhow::Result<FailureDetector<P>> {
        config.validate()?;
        if config.min_samples > config.window_size {
            warn!("minimum number of samples ({}) exceeds the window size ({}), phi will never be available", config.min_samples, config.window_size);
        }

        Ok(FailureDetector {
            state: Mutex::new(DetectorState {
                window: SampleWindow::new(config.window_size)?,
                latest_heartbeat: None,
            }),
            min_samples: config.min_samples,
            model,
        })
    }

    /// Record a heartbeat from the monitored process, received at `now`.
    ///
    /// A heartbeat with a timestamp before the most recent one (out-of-order delivery, clock
    ///  adjustments) counts as an interval of zero and does not move the most recent heartbeat
    ///  back in time.
    pub fn record_heartbeat(&self, now: u64) {
        let mut state = self.lock_state();

        match state.latest_heartbeat {
            None => {
                debug!("first heartbeat at {}ms", now);
                state.latest_heartbeat = Some(now);
            }
            Some(latest) => {
                let interval = match now.checked_sub(latest) {
                    Some(interval) => interval,
                    None => {
                        warn!("heartbeat at {}ms is older than the most recent heartbeat at {}ms - recording it as a zero interval", now, latest);
                        0
                    }
                };

                trace!("heartbeat at {}ms after an interval of {}ms", now, interval);
                state.window.insert(Duration::from_millis(interval));
                state.latest_heartbeat = Some(latest.max(now));
            }
        }
    }

    /// Calculate the suspicion level for the monitored process at `now`.
    ///
    /// Returns `Ok(None)` while there is no verdict yet, i.e. before the first heartbeat or before
    ///  `min_samples` intervals were observed. This does *not* mean that the process is healthy.
    ///
    /// An error means that phi could not be represented - typically because the silence is so
    ///  long compared to the observed intervals that phi is effectively infinite.
    pub fn phi(&self, now: u64) -> Result<Option<f64>, PhiError> {
        let snapshot = self.snapshot();

        let latest_heartbeat = match snapshot.latest_heartbeat {
            Some(latest) => latest,
            None => return Ok(None),
        };
        if snapshot.stats.count < self.min_samples || snapshot.stats.count == 0 {
            return Ok(None);
        }

        // a query timestamp before the most recent heartbeat means no silence at all
        let elapsed = Duration::from_millis(now.saturating_sub(latest_heartbeat));
        self.model.phi(&snapshot.stats, elapsed)
            .map(Some)
    }

    /// Convenience for comparing phi against an application defined threshold: `Some(true)` if
    ///  phi is below the threshold, `None` if there is no verdict yet.
    pub fn is_available(&self, now: u64, phi_threshold: f64) -> Result<Option<bool>, PhiError> {
        Ok(self.phi(now)?
            .map(|phi| phi < phi_threshold))
    }

    pub fn record_heartbeat_at(&self, clock: &dyn Clock) {
        self.record_heartbeat(clock.now_millis());
    }

    pub fn phi_at(&self, clock: &dyn Clock) -> Result<Option<f64>, PhiError> {
        self.phi(clock.now_millis())
    }

    pub fn snapshot(&self) -> DetectorSnapshot {
        let state = self.lock_state();
        DetectorSnapshot {
            latest_heartbeat: state.latest_heartbeat,
            stats: state.window.stats(),
        }
    }

    pub fn latest_heartbeat(&self) -> Option<u64> {
        self.lock_state().latest_heartbeat
    }

    pub fn sample_count(&self) -> usize {
        self.lock_state().window.count()
    }

    /// the recorded intervals, oldest first
    pub fn samples(&self) -> Vec<Duration> {
        self.lock_state().window.iter().collect()
    }

    pub fn window_size(&self) -> usize {
        self.lock_state().window.capacity()
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    fn lock_state(&self) -> MutexGuard<'_, DetectorState> {
        // no code path panics while the state is partially updated
        self.state.lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
