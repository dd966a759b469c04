//! Runs repeated training trials of the same network configuration.
//!
//! Each trial starts from freshly randomized weights and trains until the
//! convergence criteria are met. The trainer collects per-trial epoch counts
//! and keeps the network of the fastest converging trial.

use crate::training_config::TrainingConfig;
use crate::training_history::{TrainingHistory, TrialRecord};
use indicatif::style::TemplateError;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use neural_network::{Network, NetworkConfig, NetworkError, TrainingSet};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("Invalid progress bar template: {0}")]
    Progress(#[from] TemplateError),
}

/// Result of [`Trainer::run`].
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub history: TrainingHistory,
    /// Network of the converged trial with the fewest epochs, if any converged
    pub network: Option<Network>,
}

/// Trainer runs independent trials of one network configuration.
pub struct Trainer {
    network_config: NetworkConfig,
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(network_config: NetworkConfig, config: TrainingConfig) -> Self {
        Self {
            network_config,
            config,
        }
    }

    pub fn network_config(&self) -> &NetworkConfig {
        &self.network_config
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains `config.trials` networks on `samples`.
    ///
    /// Trials that hit the epoch cap are recorded as not converged. Any other
    /// error aborts the run, and criteria that can never be met are rejected
    /// before the first trial starts.
    pub fn run(&self, samples: &TrainingSet) -> Result<TrainingRun, TrainingError> {
        self.config.criteria.validate()?;
        samples.check_against(&self.network_config)?;

        let progress = self.progress_bar()?;
        info!(
            trials = self.config.trials,
            parallel = self.config.parallel,
            seed = ?self.config.seed,
            "starting training run"
        );

        let results: Vec<_> = if self.config.parallel {
            (0..self.config.trials)
                .into_par_iter()
                .map(|trial| self.run_trial(trial, samples, &progress))
                .collect()
        } else {
            (0..self.config.trials)
                .map(|trial| self.run_trial(trial, samples, &progress))
                .collect()
        };
        progress.finish_and_clear();

        let mut history = TrainingHistory::new(self.config.criteria.acceptable_error);
        let mut best: Option<(TrialRecord, Network)> = None;
        for result in results {
            let (record, network) = result?;
            history.record_trial(record);
            if let Some(network) = network {
                let faster = best
                    .as_ref()
                    .is_none_or(|(fastest, _)| record.epochs < fastest.epochs);
                if faster {
                    best = Some((record, network));
                }
            }
        }

        info!(
            converged = history.converged_count(),
            failed = history.failed_count(),
            mean_epochs = ?history.mean_epochs(),
            "training run complete"
        );

        Ok(TrainingRun {
            history,
            network: best.map(|(_, network)| network),
        })
    }

    fn run_trial(
        &self,
        trial: usize,
        samples: &TrainingSet,
        progress: &ProgressBar,
    ) -> Result<(TrialRecord, Option<Network>), NetworkError> {
        let mut network = match self.config.trial_seed(trial) {
            Some(seed) => Network::with_seed(self.network_config.clone(), seed)?,
            None => Network::new(self.network_config.clone())?,
        };

        let result = match network.train_until_converged(samples, &self.config.criteria) {
            Ok(outcome) => {
                debug!(trial, epochs = outcome.epochs, "trial converged");
                let record = TrialRecord {
                    trial,
                    epochs: outcome.epochs,
                    total_error: outcome.total_error,
                    converged: true,
                };
                (record, Some(network))
            }
            Err(NetworkError::DidNotConverge {
                epochs,
                total_error,
            }) => {
                debug!(trial, epochs, total_error, "trial did not converge");
                let record = TrialRecord {
                    trial,
                    epochs,
                    total_error,
                    converged: false,
                };
                (record, None)
            }
            Err(e) => return Err(e),
        };

        progress.inc(1);
        Ok(result)
    }

    fn progress_bar(&self) -> Result<ProgressBar, TemplateError> {
        let target = if self.config.show_progress {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let progress = ProgressBar::with_draw_target(Some(self.config.trials as u64), target);
        progress.set_style(create_progress_style(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} Trials",
        )?);
        Ok(progress)
    }
}

fn create_progress_style(template: &str) -> Result<ProgressStyle, TemplateError> {
    Ok(ProgressStyle::with_template(template)?.progress_chars("##-"))
}
