use std::cmp::max;
use std::time::Duration;
use ordered_float::OrderedFloat;
use tracing::trace;
use crate::config::DetectorConfig;
use crate::error::PhiError;
use crate::phi::{checked_mean, phi_from_tail_probability, PhiModel};
use crate::window::WindowStats;

/// The [NormalPhi] model assumes that heartbeat intervals follow a Gaussian distribution, fitting
///  mean and standard deviation from the sample window. This is the variant used by Akka and
///  Cassandra.
///
/// There are some conceptual concerns to consider when using it:
/// * 'Good' networks can lead to very repeatable heartbeat intervals, causing extremely narrow
///    Gaussian peaks, causing even small anomalies to be treated as failures. We mitigate this
///    by a lower bound for the standard deviation, giving up some of the precision of the approach.
/// * Inside data centers, heartbeats tend to arrive in multiples of the send interval, and a
///    Gaussian distribution is not a good fit for this kind of disjoint peaks.
#[derive(Debug, Clone, Copy)]
pub struct NormalPhi {
    min_std_dev: f64,
}

impl NormalPhi {
    pub fn new(min_std_dev: Duration) -> NormalPhi {
        NormalPhi {
            min_std_dev: min_std_dev.as_secs_f64(),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> NormalPhi {
        NormalPhi::new(config.min_std_dev)
    }
}

impl Default for NormalPhi {
    fn default() -> Self {
        NormalPhi::from_config(&DetectorConfig::default())
    }
}

impl PhiModel for NormalPhi {
    fn phi(&self, stats: &WindowStats, elapsed: Duration) -> Result<f64, PhiError> {
        let mean = checked_mean(stats)?;

        // we use a configurable lower bound for standard deviation to avoid a hard cut-off
        let std_dev = max(OrderedFloat(stats.std_dev), OrderedFloat(self.min_std_dev)).0;
        if !(std_dev > 0.0 && std_dev.is_finite()) {
            return Err(PhiError::DegenerateStdDev(std_dev));
        }

        let elapsed = elapsed.as_secs_f64();
        let phi = phi_from_tail_probability(gaussian_tail(elapsed, mean, std_dev), elapsed, mean)?;

        trace!("phi {} for {}s since last heartbeat with mean {}s and std deviation {}s", phi, elapsed, mean, std_dev);
        Ok(phi)
    }
}

/// Probability that a heartbeat is yet to arrive after `elapsed`, i.e. the one's complement of
///  the cumulative Gaussian distribution.
fn gaussian_tail(elapsed: f64, mean: f64, std_dev: f64) -> f64 {
    // We use the logistic approximation for the cumulative normalized Gaussian distribution
    // (e.g. https://www.econstor.eu/bitstream/10419/188388/1/v02-i01-p114_60-313-1-PB.pdf).

    // normalize
    let y = (elapsed - mean) / std_dev;
    let e = (-y * (1.5976 + 0.070566 * y * y)).exp();

    // e grows without bound left of the mean, so the two branches keep the division finite
    if elapsed > mean {
        e / (1.0 + e)
    }
    else {
        1.0 - 1.0 / (1.0 + e)
    }
}
