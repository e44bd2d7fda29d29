//! Single neuron unit with momentum-based weight updates.
//!
//! A unit never looks at the network that owns it. Everything it needs from
//! outside (the values that fed it, the target or the next layer) is passed
//! into each call.
use crate::activations::Activation;
use crate::error::{Error, Result};
use rand::Rng;
use std::num::NonZeroUsize;

/// Fraction of the previous weight change carried into each commit.
pub const MOMENTUM: f64 = 0.07;

/// Half-width of the uniform range used for fresh weights.
pub const INIT_RANGE: f64 = 0.5;

/// Where a unit's error signal comes from during backpropagation.
#[derive(Debug, Clone, Copy)]
pub enum Downstream<'a> {
    /// Output unit: the expected value for this unit.
    Target(f64),
    /// Hidden unit: the already-backpropagated layer above it, and this
    /// unit's position in its own layer (the weight index the next layer
    /// uses for it).
    Layer { next: &'a [Neuron], position: usize },
}

#[derive(Debug, Clone)]
pub struct Neuron {
    activation: Activation,
    inputs: usize,
    layer: usize,
    bias: bool,
    weights: Vec<f64>,
    previous_weights: Vec<f64>,
    pending: Vec<f64>,
    output: f64,
    sum: f64,
    delta: f64,
}

impl Neuron {
    /// Create a unit with `inputs` incoming connections and random weights.
    ///
    /// The bias input is enabled exactly when the activation asks for it, so
    /// sigmoidal units carry `inputs + 1` weights and linear units `inputs`.
    pub fn new<R: Rng>(
        activation: Activation,
        inputs: usize,
        layer: usize,
        rng: &mut R,
    ) -> Self {
        let bias = activation.uses_bias();
        let size = inputs + usize::from(bias);
        let mut neuron = Self {
            activation,
            inputs,
            layer,
            bias,
            weights: vec![0.0; size],
            previous_weights: vec![0.0; size],
            pending: vec![0.0; size],
            output: 0.0,
            sum: 0.0,
            delta: 0.0,
        };
        neuron.initialize_weights(false, rng);
        neuron
    }

    /// Reset weights. `clear` zeroes them, otherwise each one is drawn from
    /// U(-0.5, 0.5). Momentum snapshot and pending changes are zeroed either way.
    pub fn initialize_weights<R: Rng>(&mut self, clear: bool, rng: &mut R) {
        for w in self.weights.iter_mut() {
            *w = if clear {
                0.0
            } else {
                rng.gen_range(-INIT_RANGE..INIT_RANGE)
            };
        }
        self.previous_weights.iter_mut().for_each(|w| *w = 0.0);
        self.pending.iter_mut().for_each(|c| *c = 0.0);
    }

    /// Forward pass. `inputs` are the network input (layer 0) or the previous
    /// layer's outputs.
    pub fn compute_output(&mut self, inputs: &[f64]) -> Result<()> {
        self.check_inputs(inputs)?;
        let mut sum: f64 = self
            .weights
            .iter()
            .zip(inputs)
            .map(|(&w, &x)| w * x)
            .sum();
        if self.bias {
            sum += self.weights[self.inputs];
        }
        self.sum = sum;
        self.output = self.activation.apply(sum);
        Ok(())
    }

    /// Backward pass for one sample.
    ///
    /// Computes the delta and adds `2 * learning_rate * delta * input` to the
    /// pending change of every weight. `inputs` must be the same values that
    /// fed the last `compute_output`. Changes accumulate until `commit_weights`.
    pub fn compute_delta(
        &mut self,
        downstream: Downstream<'_>,
        inputs: &[f64],
        learning_rate: f64,
    ) -> Result<()> {
        self.check_inputs(inputs)?;
        let raw = match downstream {
            Downstream::Target(target) => target - self.output,
            Downstream::Layer { next, position } => next
                .iter()
                .map(|n| n.delta * n.weights[position])
                .sum(),
        };
        self.delta = raw * self.activation.derivative(self.sum, self.output);

        let step = 2.0 * learning_rate * self.delta;
        for (change, &x) in self.pending.iter_mut().zip(inputs) {
            *change += step * x;
        }
        if self.bias {
            self.pending[self.inputs] += step;
        }
        Ok(())
    }

    fn check_inputs(&self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.inputs {
            return Err(Error::ShapeMismatch {
                what: "neuron input",
                expected: self.inputs,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    /// Apply the pending changes averaged over `iterations` samples, plus momentum.
    ///
    /// `w' = w + pending / n + MOMENTUM * (w - w_prev)`; afterwards the
    /// snapshot holds the pre-update `w` and pending is zero.
    pub fn commit_weights(&mut self, iterations: NonZeroUsize) {
        let n = iterations.get() as f64;
        for ((w, prev), change) in self
            .weights
            .iter_mut()
            .zip(self.previous_weights.iter_mut())
            .zip(self.pending.iter_mut())
        {
            let old = *w;
            *w += *change / n + MOMENTUM * (old - *prev);
            *prev = old;
            *change = 0.0;
        }
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Number of declared inputs, not counting the bias.
    pub fn input_count(&self) -> usize {
        self.inputs
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn has_bias(&self) -> bool {
        self.bias
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn previous_weights(&self) -> &[f64] {
        &self.previous_weights
    }

    pub fn pending_changes(&self) -> &[f64] {
        &self.pending
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    #[cfg(test)]
    pub(crate) fn set_weights(&mut self, weights: &[f64]) {
        self.weights.copy_from_slice(weights);
    }
}
