use crate::activations::Activation;
use crate::convergence::{ConvergenceCriteria, ErrorMeasure, TrainingOutcome};
use crate::error::{NetworkError, Result};
use crate::network_config::{ErrorPropagation, NetworkConfig};
use crate::samples::TrainingSet;
use crate::weights::WeightStore;
use matrix::Matrix;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

/// Constant activation of the bias unit in the input and hidden layers.
pub const BIAS: f64 = 1.0;

/// A feedforward network with one hidden layer, trained by backpropagation
/// with momentum.
///
/// The network owns its weights, momentum buffers, the activations of the
/// last forward pass and the random number generator used to initialize the
/// weights. Nothing is shared between instances, so separate networks can be
/// trained on separate threads.
///
/// # Examples
///
/// ```
/// use neural_network::{ConvergenceCriteria, Network, NetworkConfig, TrainingSet};
///
/// let samples = TrainingSet::new(
///     vec![vec![-1.0, -1.0], vec![-1.0, 1.0], vec![1.0, -1.0], vec![1.0, 1.0]],
///     vec![vec![-1.0], vec![1.0], vec![1.0], vec![-1.0]],
/// )
/// .unwrap();
///
/// let mut network = Network::with_seed(NetworkConfig::bipolar_xor(), 1).unwrap();
/// let criteria = ConvergenceCriteria::default().with_max_epochs(100_000);
/// if let Ok(outcome) = network.train_until_converged(&samples, &criteria) {
///     assert!(outcome.total_error <= 0.05);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    activation: Activation,
    weights: WeightStore,
    /// Hidden activations of the last forward pass; the last slot is the bias.
    hidden: Vec<f64>,
    /// Output activations of the last forward pass.
    outputs: Vec<f64>,
    output_errors: Vec<f64>,
    hidden_errors: Vec<f64>,
    rng: StdRng,
}

impl Network {
    /// Creates a network with randomly initialized weights, seeded from the
    /// operating system.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidConfig`] if the configuration breaks an
    /// invariant, for instance zero hidden neurons.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates a network whose weight initialization is reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidConfig`] under the same conditions as
    /// [`Network::new`].
    pub fn with_seed(config: NetworkConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: NetworkConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;

        let mut hidden = vec![0.0; config.num_hidden + 1];
        if let Some(bias) = hidden.last_mut() {
            *bias = BIAS;
        }

        let mut network = Network {
            activation: Activation::new(config.activation),
            weights: WeightStore::new(config.num_inputs, config.num_hidden, config.num_outputs),
            hidden,
            outputs: vec![0.0; config.num_outputs],
            output_errors: vec![0.0; config.num_outputs],
            hidden_errors: vec![0.0; config.num_hidden],
            config,
            rng,
        };
        network.reset();
        Ok(network)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    pub fn weights(&self) -> &WeightStore {
        &self.weights
    }

    /// Replaces both weight matrices after checking their shapes.
    pub fn set_weights(&mut self, input_hidden: Matrix, hidden_output: Matrix) -> Result<()> {
        self.weights.replace(input_hidden, hidden_output)
    }

    /// Zeroes weights and momentum buffers, then draws fresh random weights.
    pub fn reset(&mut self) {
        let range = self.config.weight_range;
        self.weights.zero_all();
        self.weights.initialize_random(range.low, range.high, &mut self.rng);
    }

    /// Computes the output for `inputs`.
    ///
    /// The bias is appended internally, so `inputs` holds exactly
    /// `num_inputs` values. Weights are not modified.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidInput`] if the input length is wrong.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        let augmented = self.augment(inputs)?;
        self.forward(&augmented);
        Ok(self.outputs.clone())
    }

    /// Performs one backpropagation step with momentum for a single sample.
    ///
    /// Activations for `inputs` are recomputed first, so the update does not
    /// depend on whatever was fed forward before.
    ///
    /// # Errors
    ///
    /// Returns an error if `inputs` or `targets` have the wrong length.
    pub fn back_propagate(&mut self, inputs: &[f64], targets: &[f64]) -> Result<()> {
        if targets.len() != self.config.num_outputs {
            return Err(NetworkError::InvalidTarget {
                expected: self.config.num_outputs,
                actual: targets.len(),
            });
        }
        let augmented = self.augment(inputs)?;
        self.forward(&augmented);
        self.backward(&augmented, targets);
        Ok(())
    }

    /// Runs one full-batch epoch: forward pass, error accumulation and
    /// backward pass for every sample in order.
    ///
    /// Returns half the summed squared error of the epoch.
    pub fn train_epoch(&mut self, samples: &TrainingSet, measure: ErrorMeasure) -> Result<f64> {
        samples.check_against(&self.config)?;
        Ok(self.run_epoch(samples, measure))
    }

    /// Resets the weights and trains until the total error of an epoch drops
    /// to `criteria.acceptable_error`.
    ///
    /// Without `criteria.max_epochs` this loops for as long as it takes, which
    /// is forever on a mapping the network cannot learn.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DidNotConverge`] when the epoch cap is hit,
    /// [`NetworkError::InvalidConfig`] for criteria that can never be met, or
    /// a shape error if `samples` does not fit the network.
    pub fn train_until_converged(
        &mut self,
        samples: &TrainingSet,
        criteria: &ConvergenceCriteria,
    ) -> Result<TrainingOutcome> {
        criteria.validate()?;
        samples.check_against(&self.config)?;
        self.reset();

        let mut epochs = 0;
        loop {
            let total_error = self.run_epoch(samples, criteria.error_measure);
            epochs += 1;
            trace!(epoch = epochs, total_error, "epoch complete");

            if total_error <= criteria.acceptable_error {
                debug!(epochs, total_error, "converged");
                return Ok(TrainingOutcome {
                    epochs,
                    total_error,
                });
            }
            if criteria.max_epochs.is_some_and(|max| epochs >= max) {
                debug!(epochs, total_error, "epoch limit reached");
                return Err(NetworkError::DidNotConverge {
                    epochs,
                    total_error,
                });
            }
        }
    }

    fn run_epoch(&mut self, samples: &TrainingSet, measure: ErrorMeasure) -> f64 {
        let mut total_error = 0.0;
        for (input, target) in samples.iter_augmented() {
            self.forward(input);
            total_error += measure.squared_error(&self.outputs, target);
            self.backward(input, target);
        }
        total_error / 2.0
    }

    fn augment(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if inputs.len() != self.config.num_inputs {
            return Err(NetworkError::InvalidInput {
                expected: self.config.num_inputs,
                actual: inputs.len(),
            });
        }
        let mut augmented = Vec::with_capacity(inputs.len() + 1);
        augmented.extend_from_slice(inputs);
        augmented.push(BIAS);
        Ok(augmented)
    }

    /// `input` already carries the bias as its last element.
    fn forward(&mut self, input: &[f64]) {
        let hidden_sums = self.weights.input_hidden.weighted_sums(input);
        for (hidden, sum) in self.hidden.iter_mut().zip(hidden_sums) {
            *hidden = self.activation.apply(sum);
        }

        self.outputs = self.weights.hidden_output.weighted_sums(&self.hidden);
        self.activation.apply_vector(&mut self.outputs);
    }

    /// Updates both weight matrices from the activations of the last forward
    /// pass. The hidden-to-output weights are updated first.
    fn backward(&mut self, input: &[f64], targets: &[f64]) {
        let learning_rate = self.config.learning_rate;
        let momentum = self.config.momentum;

        for ((error, &target), &output) in self
            .output_errors
            .iter_mut()
            .zip(targets)
            .zip(&self.outputs)
        {
            *error = (target - output) * self.activation.derivative(output);
        }

        if self.config.error_propagation == ErrorPropagation::PreUpdate {
            self.compute_hidden_errors();
        }

        apply_momentum_update(
            &mut self.weights.hidden_output,
            &mut self.weights.hidden_output_delta,
            &self.hidden,
            &self.output_errors,
            learning_rate,
            momentum,
        );

        if self.config.error_propagation == ErrorPropagation::PostUpdate {
            self.compute_hidden_errors();
        }

        apply_momentum_update(
            &mut self.weights.input_hidden,
            &mut self.weights.input_hidden_delta,
            input,
            &self.hidden_errors,
            learning_rate,
            momentum,
        );
    }

    /// Error signal of every real hidden neuron; the bias has none.
    fn compute_hidden_errors(&mut self) {
        for (i, error) in self.hidden_errors.iter_mut().enumerate() {
            let propagated = self.weights.hidden_output.row_dot(i, &self.output_errors);
            *error = propagated * self.activation.derivative(self.hidden[i]);
        }
    }
}

/// `delta = momentum * delta + learning_rate * error * source`, then
/// `weight += delta`, for every (source, destination) pair.
fn apply_momentum_update(
    weights: &mut Matrix,
    deltas: &mut Matrix,
    sources: &[f64],
    errors: &[f64],
    learning_rate: f64,
    momentum: f64,
) {
    for (row, &source) in sources.iter().enumerate() {
        for (col, &error) in errors.iter().enumerate() {
            let delta = momentum * deltas[(row, col)] + learning_rate * error * source;
            deltas[(row, col)] = delta;
            weights[(row, col)] += delta;
        }
    }
}
