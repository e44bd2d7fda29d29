//! Feed-forward network trained by backpropagation with momentum.
use crate::activations::Activation;
use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::layers::LayerArena;
use crate::neuron::{Downstream, Neuron};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::num::NonZeroUsize;
use tracing::debug;

/// Network
///
/// Layers `0..hidden_layers` are bipolar-sigmoid units with a bias input,
/// all `neurons_per_layer` wide. The last layer holds one linear unit per
/// output and has no bias.
#[derive(Debug, Clone)]
pub struct Network {
    inputs: usize,
    outputs: usize,
    hidden_layers: usize,
    neurons_per_layer: usize,
    learning_rate: f64,
    arena: LayerArena,
    /// Input of the current sample.
    input: Vec<f64>,
    /// Expected output of the current training sample.
    targets: Vec<f64>,
    /// `learn` calls since the last commit.
    iterations: usize,
}

impl Network {
    /// Build a network from `config`, seeding weights from `config.seed` when set.
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Build a network drawing initial weights from `rng`.
    pub fn with_rng<R: Rng>(config: &NetworkConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let mut arena = LayerArena::new();
        let mut fan_in = config.inputs;
        for layer in 0..config.hidden_layers {
            arena.push_layer(
                (0..config.neurons_per_layer)
                    .map(|_| Neuron::new(Activation::bipolar_sigmoid(), fan_in, layer, &mut *rng)),
            );
            fan_in = config.neurons_per_layer;
        }
        arena.push_layer(
            (0..config.outputs)
                .map(|_| Neuron::new(Activation::linear(), fan_in, config.hidden_layers, &mut *rng)),
        );

        let mut network = Self {
            inputs: config.inputs,
            outputs: config.outputs,
            hidden_layers: config.hidden_layers,
            neurons_per_layer: config.neurons_per_layer,
            learning_rate: config.learning_rate,
            arena,
            input: vec![0.0; config.inputs],
            targets: vec![0.0; config.outputs],
            iterations: 0,
        };
        network.reset_weights(rng);
        debug!(
            inputs = network.inputs,
            outputs = network.outputs,
            hidden_layers = network.hidden_layers,
            neurons_per_layer = network.neurons_per_layer,
            learning_rate = network.learning_rate,
            "network built"
        );
        Ok(network)
    }

    /// Randomize hidden weights, clear output weights and drop any pending
    /// changes.
    pub fn reset_weights<R: Rng>(&mut self, rng: &mut R) {
        let output_layer = self.output_layer();
        for layer in 0..=output_layer {
            let clear = layer == output_layer;
            for unit in self.arena.layer_mut(layer) {
                unit.initialize_weights(clear, &mut *rng);
            }
        }
        self.iterations = 0;
        debug!("weights reset");
    }

    /// Forward pass: returns one value per output unit.
    pub fn classify(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.inputs {
            return Err(Error::ShapeMismatch {
                what: "input vector",
                expected: self.inputs,
                actual: input.len(),
            });
        }
        self.input.copy_from_slice(input);
        for layer in 0..self.arena.depth() {
            let inputs = self.layer_inputs(layer);
            for unit in self.arena.layer_mut(layer) {
                unit.compute_output(&inputs)?;
            }
        }
        Ok(self.arena.outputs(self.output_layer()))
    }

    /// Forward pass followed by backpropagation of `target`.
    ///
    /// Weight changes are only accumulated; call [`Network::validate_learning`]
    /// to apply them.
    pub fn learn(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        if target.len() != self.outputs {
            return Err(Error::ShapeMismatch {
                what: "target vector",
                expected: self.outputs,
                actual: target.len(),
            });
        }
        self.classify(input)?;
        self.targets.copy_from_slice(target);

        let learning_rate = self.learning_rate;
        let output_layer = self.output_layer();
        let inputs = self.layer_inputs(output_layer);
        for (position, unit) in self.arena.layer_mut(output_layer).iter_mut().enumerate() {
            unit.compute_delta(Downstream::Target(self.targets[position]), &inputs, learning_rate)?;
        }

        // top hidden layer first: each layer reads the deltas of the one above
        for layer in (0..output_layer).rev() {
            let inputs = self.layer_inputs(layer);
            let (current, next) = self.arena.split_with_next(layer);
            for (position, unit) in current.iter_mut().enumerate() {
                unit.compute_delta(Downstream::Layer { next, position }, &inputs, learning_rate)?;
            }
        }
        self.iterations += 1;
        Ok(())
    }

    /// Commit the changes accumulated by `learn`, averaged over the number of
    /// `learn` calls since the last commit. A no-op when nothing was learned.
    pub fn validate_learning(&mut self) {
        let Some(iterations) = NonZeroUsize::new(self.iterations) else {
            debug!("validate_learning called with nothing to commit");
            return;
        };
        for layer in (0..self.arena.depth()).rev() {
            for unit in self.arena.layer_mut(layer) {
                unit.commit_weights(iterations);
            }
        }
        self.iterations = 0;
    }

    /// Values feeding `layer`: the network input for layer 0, otherwise the
    /// outputs of the layer below.
    fn layer_inputs(&self, layer: usize) -> Vec<f64> {
        if layer == 0 {
            self.input.clone()
        } else {
            self.arena.outputs(layer - 1)
        }
    }

    fn output_layer(&self) -> usize {
        self.hidden_layers
    }

    pub fn number_of_inputs(&self) -> usize {
        self.inputs
    }

    pub fn number_of_outputs(&self) -> usize {
        self.outputs
    }

    pub fn hidden_layers(&self) -> usize {
        self.hidden_layers
    }

    /// Number of units in `layer`, `None` past the output layer.
    pub fn layer_size(&self, layer: usize) -> Option<usize> {
        (layer < self.arena.depth()).then(|| self.arena.layer_len(layer))
    }

    pub fn input(&self) -> &[f64] {
        &self.input
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn layers(&self) -> &LayerArena {
        &self.arena
    }

    /// `learn` calls waiting for the next commit.
    pub fn pending_iterations(&self) -> usize {
        self.iterations
    }

    #[cfg(test)]
    pub(crate) fn layers_mut(&mut self) -> &mut LayerArena {
        &mut self.arena
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sizes = vec![self.inputs];
        sizes.extend((0..self.arena.depth()).map(|l| self.arena.layer_len(l)));
        let weights: usize = self.arena.iter().map(|(_, n)| n.weights().len()).sum();
        write!(
            f,
            "Network: {:?}, {} weights, learning rate {}",
            sizes, weights, self.learning_rate
        )
    }
}
