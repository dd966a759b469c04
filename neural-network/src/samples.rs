use crate::error::{NetworkError, Result};
use crate::network::BIAS;
use crate::network_config::NetworkConfig;

/// An ordered set of (input, target) pairs with uniform shapes.
///
/// Inputs are stored with the bias already appended, so the training loop
/// does not rebuild the augmented vector on every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    augmented_inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
    num_inputs: usize,
    num_outputs: usize,
}

impl TrainingSet {
    /// Pairs `inputs[i]` with `targets[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty, if the two vectors differ in
    /// length, or if any row differs in length from the first one.
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(NetworkError::InvalidTarget {
                expected: inputs.len(),
                actual: targets.len(),
            });
        }
        let (Some(first_input), Some(first_target)) = (inputs.first(), targets.first()) else {
            return Err(NetworkError::EmptyTrainingSet);
        };
        let num_inputs = first_input.len();
        let num_outputs = first_target.len();

        if let Some(index) = inputs
            .iter()
            .zip(&targets)
            .position(|(input, target)| input.len() != num_inputs || target.len() != num_outputs)
        {
            return Err(NetworkError::RaggedSample { index });
        }

        let augmented_inputs = inputs
            .into_iter()
            .map(|mut input| {
                input.push(BIAS);
                input
            })
            .collect();

        Ok(Self {
            augmented_inputs,
            targets,
            num_inputs,
            num_outputs,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Iterates over `(input, target)` pairs, inputs without the bias.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.augmented_inputs
            .iter()
            .zip(&self.targets)
            .map(|(input, target)| (&input[..self.num_inputs], target.as_slice()))
    }

    pub(crate) fn iter_augmented(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.augmented_inputs
            .iter()
            .zip(&self.targets)
            .map(|(input, target)| (input.as_slice(), target.as_slice()))
    }

    /// Checks that the samples fit a network built from `config`.
    pub fn check_against(&self, config: &NetworkConfig) -> Result<()> {
        if self.num_inputs != config.num_inputs {
            return Err(NetworkError::InvalidInput {
                expected: config.num_inputs,
                actual: self.num_inputs,
            });
        }
        if self.num_outputs != config.num_outputs {
            return Err(NetworkError::InvalidTarget {
                expected: config.num_outputs,
                actual: self.num_outputs,
            });
        }
        Ok(())
    }
}
