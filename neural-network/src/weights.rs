//! Weight matrices and the momentum buffers that shadow them.
use crate::error::{NetworkError, Result, WeightSection};
use matrix::Matrix;
use rand::Rng;

/// Both weight matrices of a single-hidden-layer network plus the weight
/// change applied to each element on the previous update.
///
/// Row `i` of a weight matrix holds the weights leaving source unit `i`; the
/// last row belongs to the bias unit.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightStore {
    pub(crate) input_hidden: Matrix,
    pub(crate) hidden_output: Matrix,
    pub(crate) input_hidden_delta: Matrix,
    pub(crate) hidden_output_delta: Matrix,
}

impl WeightStore {
    /// Allocates zeroed matrices for `num_inputs` inputs, `num_hidden` hidden
    /// neurons and `num_outputs` outputs.
    pub fn new(num_inputs: usize, num_hidden: usize, num_outputs: usize) -> Self {
        Self {
            input_hidden: Matrix::zeros(num_inputs + 1, num_hidden),
            hidden_output: Matrix::zeros(num_hidden + 1, num_outputs),
            input_hidden_delta: Matrix::zeros(num_inputs + 1, num_hidden),
            hidden_output_delta: Matrix::zeros(num_hidden + 1, num_outputs),
        }
    }

    /// Draws every weight uniformly from `[low, high]`. Momentum buffers are
    /// left as they are.
    pub fn initialize_random<R: Rng + ?Sized>(&mut self, low: f64, high: f64, rng: &mut R) {
        self.input_hidden.randomize(low, high, rng);
        self.hidden_output.randomize(low, high, rng);
    }

    /// Zeroes the weights and the momentum buffers.
    pub fn zero_all(&mut self) {
        self.input_hidden.fill(0.0);
        self.hidden_output.fill(0.0);
        self.input_hidden_delta.fill(0.0);
        self.hidden_output_delta.fill(0.0);
    }

    /// Replaces both weight matrices at once.
    ///
    /// Both shapes are checked before anything is written, so a mismatch
    /// leaves the store untouched. Momentum buffers are not modified.
    pub fn replace(&mut self, input_hidden: Matrix, hidden_output: Matrix) -> Result<()> {
        check_shape(
            WeightSection::InputHidden,
            self.input_hidden.shape(),
            input_hidden.shape(),
        )?;
        check_shape(
            WeightSection::HiddenOutput,
            self.hidden_output.shape(),
            hidden_output.shape(),
        )?;

        self.input_hidden = input_hidden;
        self.hidden_output = hidden_output;
        Ok(())
    }

    pub fn input_hidden(&self) -> &Matrix {
        &self.input_hidden
    }

    pub fn hidden_output(&self) -> &Matrix {
        &self.hidden_output
    }

    /// Last weight change applied to the input-to-hidden weights.
    pub fn input_hidden_delta(&self) -> &Matrix {
        &self.input_hidden_delta
    }

    /// Last weight change applied to the hidden-to-output weights.
    pub fn hidden_output_delta(&self) -> &Matrix {
        &self.hidden_output_delta
    }
}

pub(crate) fn check_shape(
    section: WeightSection,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<()> {
    if expected != found {
        return Err(NetworkError::ShapeMismatch {
            section,
            expected: expected.into(),
            found: found.into(),
        });
    }
    Ok(())
}
