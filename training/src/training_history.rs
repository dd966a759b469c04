use std::fmt;

/// Outcome of one training trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialRecord {
    /// Index of the trial within the run
    pub trial: usize,
    /// Epochs run, including the one that met the criteria
    pub epochs: usize,
    /// Total error of the last epoch
    pub total_error: f64,
    /// `false` when the trial hit the epoch cap
    pub converged: bool,
}

/// Per-trial results of a training run, ordered by trial index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    pub trials: Vec<TrialRecord>,
    /// Error threshold the trials were trained towards
    pub acceptable_error: f64,
}

impl TrainingHistory {
    pub fn new(acceptable_error: f64) -> Self {
        Self {
            trials: Vec::new(),
            acceptable_error,
        }
    }

    pub(crate) fn record_trial(&mut self, record: TrialRecord) {
        self.trials.push(record);
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn converged(&self) -> impl Iterator<Item = &TrialRecord> {
        self.trials.iter().filter(|record| record.converged)
    }

    pub fn converged_count(&self) -> usize {
        self.converged().count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.converged_count()
    }

    /// Mean epochs over the converged trials.
    pub fn mean_epochs(&self) -> Option<f64> {
        let count = self.converged_count();
        if count == 0 {
            return None;
        }
        let total: usize = self.converged().map(|record| record.epochs).sum();
        Some(total as f64 / count as f64)
    }

    pub fn min_epochs(&self) -> Option<usize> {
        self.converged().map(|record| record.epochs).min()
    }

    pub fn max_epochs(&self) -> Option<usize> {
        self.converged().map(|record| record.epochs).max()
    }

    /// The converged trial with the fewest epochs; ties go to the lower index.
    pub fn best_trial(&self) -> Option<&TrialRecord> {
        self.converged()
            .min_by_key(|record| (record.epochs, record.trial))
    }
}

impl fmt::Display for TrainingHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training History Summary:")?;
        writeln!(f, "------------------------")?;
        writeln!(
            f,
            "Trials: {} ({} converged, {} hit the epoch limit)",
            self.len(),
            self.converged_count(),
            self.failed_count()
        )?;

        match (self.mean_epochs(), self.min_epochs(), self.max_epochs()) {
            (Some(mean), Some(min), Some(max)) => {
                writeln!(f, "Fewest epochs: {min}")?;
                writeln!(f, "Most epochs: {max}")?;
                write!(
                    f,
                    "On average {mean:.1} epochs is taken to reach a total error of less than {}",
                    self.acceptable_error
                )
            }
            _ => write!(f, "No trial converged"),
        }
    }
}
