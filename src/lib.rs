//! A small multilayer perceptron for binary fraud classification: bipolar
//! sigmoid hidden layers, a linear output layer, backpropagation with
//! momentum, and two training-stop policies.
//!
//! - Neuron units with accumulated weight changes and momentum commits
//! - Layer arena addressed by `(layer, position)`
//! - Trainer with quality-plateau and fixed-epoch policies
//! - Delimited-text and in-memory record sources

pub mod activations;
pub mod config;
pub mod controller;
pub mod datasets;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod neuron;
pub mod utils;

pub use activations::Activation;
pub use config::{AppConfig, NetworkConfig, ReferencePopulation, StoppingPolicy, TrainingConfig};
pub use controller::{TestReport, Trainer, TrainingSummary};
pub use datasets::{CsvSource, DataSource, MemorySource};
pub use error::{Error, Result};
pub use layers::LayerArena;
pub use metrics::{interpret_output, weighted_error_score, Evaluation};
pub use network::Network;
pub use neuron::{Downstream, Neuron};
pub use utils::{print_model_summary, print_test_report, print_training_history, xor_dataset};
