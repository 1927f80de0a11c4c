use std::time::Duration;
use anyhow::bail;

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// number of most recent heartbeat intervals a detector bases its estimate on
    pub window_size: usize,
    /// a detector reports no phi before it has observed this many intervals
    pub min_samples: usize,
    /// lower bound for the standard deviation of [crate::phi::NormalPhi], which reads it in
    ///  [crate::phi::NormalPhi::from_config]. Detectors and registries only use it if they are
    ///  created `with_model` and such a model; the default exponential model ignores it.
    pub min_std_dev: Duration,
}

impl DetectorConfig {
    pub fn new(window_size: usize, min_samples: usize) -> DetectorConfig {
        DetectorConfig {
            window_size,
            min_samples,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.window_size == 0 {
            bail!("window size must be positive");
        }

        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            window_size: 1000,
            min_samples: 10,
            min_std_dev: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case(1, 0)]
    #[case(1, 1)]
    #[case(5, 3)]
    #[case(1000, 1000)]
    #[case(5, 6)]
    fn test_valid(#[case] window_size: usize, #[case] min_samples: usize) {
        assert!(DetectorConfig::new(window_size, min_samples).validate().is_ok());
    }

    #[rstest]
    #[case(0, 0)]
    #[case(0, 1)]
    fn test_invalid(#[case] window_size: usize, #[case] min_samples: usize) {
        assert!(DetectorConfig::new(window_size, min_samples).validate().is_err());
    }
}
