//! Activation functions available to neuron units.
use std::fmt;

/// Slope of the linear activation used by output units.
pub const LINEAR_ALPHA: f64 = 0.15;

/// Steepness of the bipolar sigmoid used by hidden units.
pub const SIGMOID_ALPHA: f64 = 1.0;

/// Activation kinds. Each unit picks one at construction and keeps it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    /// Linear: alpha * x
    Linear { alpha: f64 },
    /// Bipolar sigmoid: (1 - exp(-alpha x)) / (1 + exp(-alpha x))
    BipolarSigmoid { alpha: f64 },
}

impl Activation {
    /// Linear activation with the output-layer slope.
    pub const fn linear() -> Self {
        Activation::Linear { alpha: LINEAR_ALPHA }
    }

    /// Bipolar sigmoid with the hidden-layer steepness.
    pub const fn bipolar_sigmoid() -> Self {
        Activation::BipolarSigmoid { alpha: SIGMOID_ALPHA }
    }

    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Activation::Linear { alpha } => alpha * x,
            Activation::BipolarSigmoid { alpha } => {
                let e = (-alpha * x).exp();
                (1.0 - e) / (1.0 + e)
            }
        }
    }

    /// Derivative at the last forward pass.
    ///
    /// `_sum` is the stored pre-activation value and `output` the stored
    /// activation. Neither current kind needs the sum: the sigmoid reads
    /// `output`, so the unit must have been evaluated on the current sample
    /// before this is called.
    pub fn derivative(&self, _sum: f64, output: f64) -> f64 {
        match *self {
            Activation::Linear { alpha } => alpha,
            Activation::BipolarSigmoid { alpha } => alpha * (1.0 - output * output),
        }
    }

    pub fn apply_vec(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&xi| self.apply(xi)).collect()
    }

    /// Whether units with this activation get the constant bias input.
    pub fn uses_bias(&self) -> bool {
        matches!(self, Activation::BipolarSigmoid { .. })
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Linear { alpha } => write!(f, "linear(α={})", alpha),
            Activation::BipolarSigmoid { alpha } => write!(f, "bipolar-sigmoid(α={})", alpha),
        }
    }
}
