//! Single-hidden-layer feedforward network trained by backpropagation with
//! momentum, in binary (0/1) or bipolar (-1/1) activation mode.

// Modules
pub mod activations;
mod convergence;
mod error;
mod network;
mod network_config;
mod persistence;
mod samples;
mod weights;

pub use activations::{Activation, ActivationType, BINARY, BIPOLAR, DerivativeForm};
pub use convergence::{
    ConvergenceCriteria, DEFAULT_ACCEPTABLE_ERROR, ErrorMeasure, TrainingOutcome,
};
pub use error::{NetworkError, Result, Shape, WeightSection};
pub use matrix::Matrix;
pub use network::{BIAS, Network};
pub use network_config::{
    ErrorPropagation, NetworkConfig, NetworkConfigBuilder, NetworkConfigBuilderError, WeightRange,
};
pub use persistence::{HIDDEN_OUTPUT_LABEL, INPUT_HIDDEN_LABEL};
pub use samples::TrainingSet;
pub use weights::WeightStore;
