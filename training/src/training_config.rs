use neural_network::ConvergenceCriteria;

/// Configuration for a series of independent training trials.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Number of independent trials, each starting from fresh random weights
    pub trials: usize,
    /// Base seed; trial `i` is seeded with `seed + i`. `None` seeds every
    /// trial from the operating system.
    pub seed: Option<u64>,
    /// Run trials on the rayon thread pool
    pub parallel: bool,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
    /// When each trial stops
    pub criteria: ConvergenceCriteria,
}

impl TrainingConfig {
    /// Seed for trial `trial`, if the run is seeded.
    pub fn trial_seed(&self, trial: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(trial as u64))
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            seed: None,
            parallel: false,
            show_progress: false,
            criteria: ConvergenceCriteria::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_config_default() {
        let config = TrainingConfig::default();
        assert_eq!(config.trials, 100);
        assert_eq!(config.seed, None);
        assert!(!config.parallel);
        assert!(!config.show_progress);
        assert_eq!(config.criteria, ConvergenceCriteria::default());
    }

    #[test]
    fn test_trial_seed() {
        let unseeded = TrainingConfig::default();
        assert_eq!(unseeded.trial_seed(3), None);

        let seeded = TrainingConfig {
            seed: Some(u64::MAX),
            ..TrainingConfig::default()
        };
        assert_eq!(seeded.trial_seed(0), Some(u64::MAX));
        assert_eq!(seeded.trial_seed(1), Some(0));
    }
}
