//! Sigmoid squashing functions and their derivatives.
//!
//! Every activation here has the general form
//! `f(x) = (upper - lower) / (1 + e^-x) + lower`, with asymptotes at `lower`
//! and `upper`. The derivative is expressed in terms of the function's own
//! output `y`, which is what backpropagation has at hand.
use serde::{Deserialize, Serialize};

/// Formula used for the derivative, given the activation output `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivativeForm {
    /// `y * (1 - y)`
    Binary,
    /// `0.5 * (1 - y^2)`
    Bipolar,
}

/// Activation mode selected in the network configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActivationType {
    /// Logistic sigmoid with outputs in (0, 1).
    Binary,
    /// Bipolar sigmoid `2 / (1 + e^-x) - 1` with outputs in (-1, 1).
    Bipolar,
    /// Sigmoid bounded by (`lower`, `upper`) with an explicitly chosen derivative.
    Custom {
        lower: f64,
        upper: f64,
        derivative: DerivativeForm,
    },
}

impl ActivationType {
    /// Asymptotes `(a, b)` of the squashing function.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            ActivationType::Binary => (0.0, 1.0),
            ActivationType::Bipolar => (-1.0, 1.0),
            ActivationType::Custom { lower, upper, .. } => (lower, upper),
        }
    }

    pub fn derivative_form(&self) -> DerivativeForm {
        match *self {
            ActivationType::Binary => DerivativeForm::Binary,
            ActivationType::Bipolar => DerivativeForm::Bipolar,
            ActivationType::Custom { derivative, .. } => derivative,
        }
    }
}

/// A resolved activation: bounds plus derivative form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Activation {
    lower: f64,
    upper: f64,
    derivative_form: DerivativeForm,
}

impl Activation {
    pub fn new(activation_type: ActivationType) -> Self {
        let (lower, upper) = activation_type.bounds();
        Self {
            lower,
            upper,
            derivative_form: activation_type.derivative_form(),
        }
    }

    /// `(upper - lower) / (1 + e^-x) + lower`.
    ///
    /// For very negative `x`, `e^-x` overflows to infinity and the result is
    /// exactly `lower`; for very positive `x` it rounds to `upper`.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        (self.upper - self.lower) / (1.0 + (-x).exp()) + self.lower
    }

    /// Derivative of the activation, given its output `y`.
    #[inline]
    pub fn derivative(&self, y: f64) -> f64 {
        match self.derivative_form {
            DerivativeForm::Binary => y * (1.0 - y),
            DerivativeForm::Bipolar => 0.5 * (1.0 - y * y),
        }
    }

    pub fn apply_vector(&self, values: &mut [f64]) {
        for value in values {
            *value = self.apply(*value);
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl From<ActivationType> for Activation {
    fn from(activation_type: ActivationType) -> Self {
        Activation::new(activation_type)
    }
}

pub const BINARY: Activation = Activation {
    lower: 0.0,
    upper: 1.0,
    derivative_form: DerivativeForm::Binary,
};

pub const BIPOLAR: Activation = Activation {
    lower: -1.0,
    upper: 1.0,
    derivative_form: DerivativeForm::Bipolar,
};
