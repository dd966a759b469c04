use std::fmt;
use thiserror::Error;

/// Which of the two weight blocks an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightSection {
    InputHidden,
    HiddenOutput,
}

impl fmt::Display for WeightSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightSection::InputHidden => write!(f, "input-to-hidden"),
            WeightSection::HiddenOutput => write!(f, "hidden-to-output"),
        }
    }
}

/// Rows by columns of a weight matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self { rows, cols }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Errors raised by the network engine.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Wrapper for standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Network configuration file could not be parsed
    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration violates a structural invariant
    #[error("Invalid network configuration: {0}")]
    InvalidConfig(String),
    /// Stored weights do not fit the live network
    #[error("Shape mismatch in {section} weights: network expects {expected}, found {found}")]
    ShapeMismatch {
        section: WeightSection,
        expected: Shape,
        found: Shape,
    },
    /// Weight file content could not be parsed
    #[error("Malformed weight file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("Invalid number of inputs: expected {expected}, got {actual}")]
    InvalidInput { expected: usize, actual: usize },
    #[error("Invalid number of targets: expected {expected}, got {actual}")]
    InvalidTarget { expected: usize, actual: usize },
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Sample {index} does not have the same shape as the first sample")]
    RaggedSample { index: usize },
    /// The optional epoch cap was reached first
    #[error("Did not converge after {epochs} epochs (total error {total_error})")]
    DidNotConverge { epochs: usize, total_error: f64 },
}

pub type Result<T> = std::result::Result<T, NetworkError>;
