pub mod exponential;
pub mod normal;

use std::time::Duration;
use crate::error::PhiError;
use crate::window::WindowStats;

pub use exponential::{exponential_phi, ExponentialPhi};
pub use normal::NormalPhi;

/// A [PhiModel] assumes some probability distribution for the intervals between heartbeats, fits
///  it to a window's statistics, and turns the time elapsed since the most recent heartbeat into
///  phi = -log10(1 - CDF(elapsed)), i.e. the probability that a heartbeat is still going to arrive
///  expressed as a power of ten.
///
/// If one chose to suspect a process at phi == 1, there is a 10% chance that the suspicion is
///  wrong, at phi == 2 a 1% chance, and so on.
///
/// Implementations are stateless with regard to heartbeats and must be safe to call concurrently.
#[cfg_attr(test, mockall::automock)]
pub trait PhiModel: Send + Sync {
    fn phi(&self, stats: &WindowStats, elapsed: Duration) -> Result<f64, PhiError>;
}

/// turns the probability that a heartbeat is yet to arrive into phi
fn phi_from_tail_probability(tail: f64, elapsed: f64, mean: f64) -> Result<f64, PhiError> {
    if tail.is_nan() || tail <= 0.0 {
        return Err(PhiError::TailUnderflow { elapsed, mean });
    }

    let phi = -tail.log10();
    // avoid returning -0.0 for a tail probability of exactly 1
    Ok(if phi > 0.0 { phi } else { 0.0 })
}

fn checked_mean(stats: &WindowStats) -> Result<f64, PhiError> {
    match stats.mean {
        None => Err(PhiError::EmptyWindow),
        Some(mean) if mean > 0.0 && mean.is_finite() => Ok(mean),
        Some(mean) => Err(PhiError::NonPositiveMean(mean)),
    }
}
