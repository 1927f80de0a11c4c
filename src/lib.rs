//! A phi accrual failure detector: instead of a binary verdict whether a monitored process is
//!  alive, it reports a continuous suspicion level phi based on the history of heartbeat arrival
//!  times. Applications pick a phi threshold to trade off false positives against detection
//!  latency.

pub mod clock;
pub mod config;
pub mod detector;
pub mod error;
pub mod phi;
pub mod registry;
pub mod window;

#[cfg(test)]
mod test_util;

pub use clock::{Clock, TokioClock};
pub use config::DetectorConfig;
pub use detector::{DetectorSnapshot, FailureDetector};
pub use error::PhiError;
pub use phi::{ExponentialPhi, NormalPhi, PhiModel};
pub use registry::DetectorRegistry;
pub use window::{SampleWindow, WindowStats};


#[cfg(test)]
mod test {
    use tracing::Level;

    #[ctor::ctor]
    fn init_test_logging() {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(Level::DEBUG)
            .try_init()
            .ok();
    }
}
