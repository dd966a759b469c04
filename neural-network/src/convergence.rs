use crate::error::{NetworkError, Result};

/// Total error at or below which training stops by default.
pub const DEFAULT_ACCEPTABLE_ERROR: f64 = 0.05;

/// How the squared error of one sample is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMeasure {
    /// Only the first output neuron contributes.
    #[default]
    FirstOutput,
    /// Every output neuron contributes.
    AllOutputs,
}

impl ErrorMeasure {
    /// Sum of squared differences between `outputs` and `targets`.
    pub fn squared_error(&self, outputs: &[f64], targets: &[f64]) -> f64 {
        let take = match self {
            ErrorMeasure::FirstOutput => 1,
            ErrorMeasure::AllOutputs => outputs.len(),
        };
        outputs
            .iter()
            .zip(targets)
            .take(take)
            .map(|(output, target)| (output - target).powi(2))
            .sum()
    }
}

/// When [`Network::train_until_converged`](crate::Network::train_until_converged) stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceCriteria {
    /// Training stops once the epoch's total error is at or below this value.
    pub acceptable_error: f64,
    /// Optional cap on the number of epochs. `None` trains until convergence,
    /// however long that takes.
    pub max_epochs: Option<usize>,
    pub error_measure: ErrorMeasure,
}

impl ConvergenceCriteria {
    pub fn with_max_epochs(self, max_epochs: usize) -> Self {
        Self {
            max_epochs: Some(max_epochs),
            ..self
        }
    }

    /// Rejects criteria that can never be met: a non-finite threshold, which
    /// no epoch error compares at or below, and a cap of zero epochs.
    pub fn validate(&self) -> Result<()> {
        if !self.acceptable_error.is_finite() {
            return Err(NetworkError::InvalidConfig(format!(
                "acceptable error {} must be finite",
                self.acceptable_error
            )));
        }
        if self.max_epochs == Some(0) {
            return Err(NetworkError::InvalidConfig(
                "the epoch limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            acceptable_error: DEFAULT_ACCEPTABLE_ERROR,
            max_epochs: None,
            error_measure: ErrorMeasure::FirstOutput,
        }
    }
}

/// Result of a converged training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOutcome {
    /// Number of epochs run, counting the one that met the criteria.
    pub epochs: usize,
    /// Total error of the final epoch.
    pub total_error: f64,
}
