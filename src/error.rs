use thiserror::Error;

/// Failure to evaluate phi for a given window and elapsed time. None of these are transient: a
///  caller's policy will typically treat an affected process as maximally suspect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhiError {
    #[error("no samples to fit a distribution to")]
    EmptyWindow,

    #[error("mean heartbeat interval must be positive and finite, was {0}s")]
    NonPositiveMean(f64),

    /// The probability of a heartbeat still arriving is too small to be represented, so phi is
    ///  effectively infinite.
    #[error("tail probability underflow after {elapsed}s of silence (mean {mean}s)")]
    TailUnderflow {
        elapsed: f64,
        mean: f64,
    },

    #[error("standard deviation must be positive and finite, was {0}s")]
    DegenerateStdDev(f64),
}
