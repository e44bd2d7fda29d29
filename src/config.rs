//! Network, training and application configuration.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Shape and learning rate of a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of input features
    pub inputs: usize,
    /// Number of outputs
    pub outputs: usize,
    /// Number of hidden layers (may be 0)
    pub hidden_layers: usize,
    /// Width shared by every hidden layer
    pub neurons_per_layer: usize,
    pub learning_rate: f64,
    /// Seed for weight initialization; entropy when absent
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            inputs: 29,
            outputs: 1,
            hidden_layers: 3,
            neurons_per_layer: 30,
            learning_rate: DEFAULT_LEARNING_RATE,
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn new(inputs: usize, outputs: usize, hidden_layers: usize, neurons_per_layer: usize) -> Self {
        Self {
            inputs,
            outputs,
            hidden_layers,
            neurons_per_layer,
            ..Default::default()
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 {
            return Err(Error::InvalidConfig("inputs must be > 0".into()));
        }
        if self.outputs == 0 {
            return Err(Error::InvalidConfig("outputs must be > 0".into()));
        }
        if self.hidden_layers > 0 && self.neurons_per_layer == 0 {
            return Err(Error::InvalidConfig("neurons_per_layer must be > 0".into()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// When a training run stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoppingPolicy {
    /// Keep training while either the misclassification count or the
    /// weighted error strictly improves.
    QualityPlateau {
        #[serde(default)]
        max_epochs: Option<usize>,
    },
    /// Train a fixed number of epochs without evaluating.
    FixedEpochs { epochs: usize },
}

impl Default for StoppingPolicy {
    fn default() -> Self {
        StoppingPolicy::QualityPlateau { max_epochs: None }
    }
}

/// Class sizes the accuracy percentages of a test report are computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePopulation {
    pub negatives: usize,
    pub positives: usize,
}

impl Default for ReferencePopulation {
    fn default() -> Self {
        Self {
            negatives: 284_315,
            positives: 492,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub samples_per_epoch: usize,
    pub policy: StoppingPolicy,
    pub reference: ReferencePopulation,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples_per_epoch: 600,
            policy: StoppingPolicy::default(),
            reference: ReferencePopulation::default(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples_per_epoch == 0 {
            return Err(Error::InvalidConfig("samples_per_epoch must be > 0".into()));
        }
        if self.reference.negatives == 0 || self.reference.positives == 0 {
            return Err(Error::InvalidConfig("reference population sizes must be > 0".into()));
        }
        Ok(())
    }
}

/// Everything the command-line runner needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub training: TrainingConfig,
    pub train_file: String,
    pub test_file: String,
    /// Single-byte field separator
    pub delimiter: char,
    pub skip_header: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            training: TrainingConfig::default(),
            train_file: "bal.csv".to_string(),
            test_file: "ful.csv".to_string(),
            delimiter: ';',
            skip_header: true,
        }
    }
}

impl AppConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: AppConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.training.validate()?;
        self.delimiter_byte()?;
        Ok(())
    }

    /// The delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(Error::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fraud_setup() {
        let config = AppConfig::default();
        assert_eq!(config.network.inputs, 29);
        assert_eq!(config.network.hidden_layers, 3);
        assert_eq!(config.network.neurons_per_layer, 30);
        assert_eq!(config.training.samples_per_epoch, 600);
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "network": { "inputs": 2, "hidden_layers": 1, "neurons_per_layer": 2, "seed": 9 },
            "training": { "policy": { "kind": "fixed_epochs", "epochs": 50 } },
            "delimiter": ","
        }"#;
        let config = AppConfig::from_json_str(json).unwrap();
        assert_eq!(config.network.inputs, 2);
        assert_eq!(config.network.outputs, 1);
        assert_eq!(config.network.seed, Some(9));
        assert_eq!(config.network.learning_rate, DEFAULT_LEARNING_RATE);
        assert_eq!(config.training.policy, StoppingPolicy::FixedEpochs { epochs: 50 });
        assert_eq!(config.training.samples_per_epoch, 600);
        assert_eq!(config.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn rejects_bad_values() {
        assert!(NetworkConfig::new(0, 1, 1, 2).validate().is_err());
        assert!(NetworkConfig::new(2, 0, 1, 2).validate().is_err());
        assert!(NetworkConfig::new(2, 1, 1, 0).validate().is_err());
        assert!(NetworkConfig::new(2, 1, 0, 0).validate().is_ok());
        assert!(NetworkConfig::new(2, 1, 1, 2)
            .with_learning_rate(0.0)
            .validate()
            .is_err());
        assert!(NetworkConfig::new(2, 1, 1, 2)
            .with_learning_rate(f64::NAN)
            .validate()
            .is_err());

        let mut app = AppConfig::default();
        app.delimiter = 'é';
        assert!(matches!(app.validate(), Err(Error::InvalidConfig(_))));
    }
}
