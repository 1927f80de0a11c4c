use std::f64::consts::LOG10_E;
use std::time::Duration;
use tracing::trace;
use crate::error::PhiError;
use crate::phi::{checked_mean, PhiModel};
use crate::window::WindowStats;

/// The [ExponentialPhi] model assumes that heartbeat intervals are exponentially distributed with
///  a mean equal to the observed sample mean. This is the simplified variant from "The Phi
///  Accrual Failure Detector" (Hayashibara et al., 2004): it needs nothing but the mean and is
///  cheap to evaluate, and it is accurate enough for monitoring purposes.
///
/// With rate 1/mean, the probability that a heartbeat is yet to arrive after `elapsed` is
///  `exp(-elapsed / mean)`, so phi grows linearly with the elapsed time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialPhi;

impl PhiModel for ExponentialPhi {
    fn phi(&self, stats: &WindowStats, elapsed: Duration) -> Result<f64, PhiError> {
        let mean = checked_mean(stats)?;
        exponential_phi(mean, elapsed)
    }
}

/// Calculate phi for a mean heartbeat interval (in seconds) and the time elapsed since the last
///  heartbeat.
pub fn exponential_phi(mean: f64, elapsed: Duration) -> Result<f64, PhiError> {
    if !(mean > 0.0 && mean.is_finite()) {
        return Err(PhiError::NonPositiveMean(mean));
    }

    let elapsed = elapsed.as_secs_f64();
    if elapsed == 0.0 {
        return Ok(0.0);
    }

    // -log10(exp(-x)) == x * log10(e), without rounding x through exp()
    let x = elapsed / mean;
    if (-x).exp() == 0.0 {
        return Err(PhiError::TailUnderflow { elapsed, mean });
    }
    let phi = x * LOG10_E;

    trace!("phi {} for {}s since last heartbeat with mean {}s", phi, elapsed, mean);
    Ok(phi)
}
