//! Configuration types for the scheduling system.

/// Default cross-over threshold.
///
/// When the minimum-EFT processor is not also the cheapest processor for a
/// task, the choice is overridden to the maximum-EFT processor if
/// `heterogeneity(costs) / heterogeneity(efts) >= CROSS_THRESHOLD`.
pub const CROSS_THRESHOLD: f64 = 0.3;

/// Configuration for the heterogeneous list scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Ratio at or above which the cross-over override is applied.
    pub cross_threshold: f64,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cross_threshold: CROSS_THRESHOLD,
            verbosity: 0,
        }
    }
}

impl SchedulerConfig {
    pub fn with_cross_threshold(mut self, cross_threshold: f64) -> Self {
        self.cross_threshold = cross_threshold;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SchedulerConfig::default();
        assert!((config.cross_threshold - 0.3).abs() < 1e-12);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn test_config_builders() {
        let config = SchedulerConfig::default()
            .with_cross_threshold(0.5)
            .with_verbosity(2);
        assert!((config.cross_threshold - 0.5).abs() < 1e-12);
        assert_eq!(config.verbosity, 2);
    }
}
