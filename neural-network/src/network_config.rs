use crate::activations::ActivationType;
use crate::error::{NetworkError, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Closed range that freshly initialized weights are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub low: f64,
    pub high: f64,
}

impl WeightRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    fn check(&self) -> std::result::Result<(), String> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(format!(
                "weight range [{}, {}] must be finite",
                self.low, self.high
            ));
        }
        if self.low > self.high {
            return Err(format!(
                "weight range lower bound {} exceeds upper bound {}",
                self.low, self.high
            ));
        }
        Ok(())
    }
}

impl Default for WeightRange {
    fn default() -> Self {
        Self::new(-0.5, 0.5)
    }
}

/// Which hidden-to-output weights the hidden error signals are computed from.
///
/// Backpropagation updates the hidden-to-output weights before it moves on to
/// the hidden layer. `PostUpdate` propagates the output error through the
/// weights as they stand after that update; `PreUpdate` uses the values from
/// before it, which is the exact gradient for the sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorPropagation {
    #[default]
    PostUpdate,
    PreUpdate,
}

/// Configuration for a single-hidden-layer network.
///
/// The configuration fixes the shape of both weight matrices: the
/// input-to-hidden matrix is `(num_inputs + 1) x num_hidden` and the
/// hidden-to-output matrix is `(num_hidden + 1) x num_outputs`, the extra row
/// in each holding the bias weights.
///
/// # Example
///
/// ```
/// use neural_network::{ActivationType, NetworkConfigBuilder};
///
/// let config = NetworkConfigBuilder::default()
///     .num_inputs(2)
///     .num_hidden(4)
///     .num_outputs(1)
///     .activation(ActivationType::Binary)
///     .build()
///     .unwrap();
/// assert_eq!(config.learning_rate, 0.2);
/// assert_eq!(config.input_hidden_shape(), (3, 4));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NetworkConfig {
    /// Number of inputs, not counting the bias.
    pub num_inputs: usize,

    /// Number of hidden neurons in the single hidden layer.
    pub num_hidden: usize,

    /// Number of output neurons.
    pub num_outputs: usize,

    /// Learning rate applied to every weight update.
    #[builder(default = "0.2")]
    pub learning_rate: f64,

    /// Fraction of the previous weight change carried into the next one.
    #[builder(default = "0.9")]
    pub momentum: f64,

    /// Range for random weight initialization.
    #[builder(default)]
    pub weight_range: WeightRange,

    /// Squashing function used by both hidden and output neurons.
    #[builder(default = "ActivationType::Bipolar")]
    pub activation: ActivationType,

    #[builder(default)]
    #[serde(default)]
    pub error_propagation: ErrorPropagation,
}

impl NetworkConfig {
    /// The configuration used for bipolar XOR: 2-4-1, learning rate 0.2,
    /// momentum 0.9, weights in [-0.5, 0.5].
    pub fn bipolar_xor() -> Self {
        Self {
            num_inputs: 2,
            num_hidden: 4,
            num_outputs: 1,
            learning_rate: 0.2,
            momentum: 0.9,
            weight_range: WeightRange::default(),
            activation: ActivationType::Bipolar,
            error_propagation: ErrorPropagation::PostUpdate,
        }
    }

    /// Same hyperparameters as [`NetworkConfig::bipolar_xor`] in binary mode.
    pub fn binary_xor() -> Self {
        Self {
            activation: ActivationType::Binary,
            ..Self::bipolar_xor()
        }
    }

    /// Loads a network configuration from a JSON file and checks its invariants.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use neural_network::NetworkConfig;
    /// use std::path::Path;
    ///
    /// let config = NetworkConfig::load(Path::new("config.json")).unwrap();
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config: NetworkConfig = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the structural invariants a deserialized configuration must hold.
    pub fn validate(&self) -> Result<()> {
        check_layers(self.num_inputs, self.num_hidden, self.num_outputs)
            .and_then(|_| check_rates(self.learning_rate, self.momentum))
            .and_then(|_| self.weight_range.check())
            .and_then(|_| check_activation(&self.activation))
            .map_err(NetworkError::InvalidConfig)
    }

    /// Shape of the input-to-hidden matrix, bias row included.
    pub fn input_hidden_shape(&self) -> (usize, usize) {
        (self.num_inputs + 1, self.num_hidden)
    }

    /// Shape of the hidden-to-output matrix, bias row included.
    pub fn hidden_output_shape(&self) -> (usize, usize) {
        (self.num_hidden + 1, self.num_outputs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::bipolar_xor()
    }
}

impl NetworkConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        check_layers(
            self.num_inputs.unwrap_or(1),
            self.num_hidden.unwrap_or(1),
            self.num_outputs.unwrap_or(1),
        )?;
        check_rates(
            self.learning_rate.unwrap_or(0.0),
            self.momentum.unwrap_or(0.0),
        )?;
        if let Some(range) = &self.weight_range {
            range.check()?;
        }
        if let Some(activation) = &self.activation {
            check_activation(activation)?;
        }
        Ok(())
    }
}

fn check_layers(
    num_inputs: usize,
    num_hidden: usize,
    num_outputs: usize,
) -> std::result::Result<(), String> {
    if num_inputs == 0 {
        return Err("the network needs at least one input".to_string());
    }
    if num_hidden == 0 {
        return Err("the hidden layer needs at least one neuron".to_string());
    }
    if num_outputs == 0 {
        return Err("the network needs at least one output".to_string());
    }
    Ok(())
}

fn check_rates(learning_rate: f64, momentum: f64) -> std::result::Result<(), String> {
    if !learning_rate.is_finite() || learning_rate < 0.0 {
        return Err(format!(
            "learning rate {learning_rate} must be finite and non-negative"
        ));
    }
    if !momentum.is_finite() || momentum < 0.0 {
        return Err(format!("momentum {momentum} must be finite and non-negative"));
    }
    Ok(())
}

fn check_activation(activation: &ActivationType) -> std::result::Result<(), String> {
    let (lower, upper) = activation.bounds();
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(format!(
            "activation bounds ({lower}, {upper}) must be finite with lower < upper"
        ));
    }
    Ok(())
}
