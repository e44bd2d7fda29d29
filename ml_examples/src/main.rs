// ml_examples/src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use fraud_mlp::{
    print_model_summary, print_test_report, print_training_history, AppConfig, CsvSource,
    Network, StoppingPolicy, Trainer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Train a fraud classifier on one delimited file and test it on another.
#[derive(Debug, Parser)]
#[command(name = "fraud-train", version)]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<String>,

    /// Training data file
    #[arg(long)]
    train: Option<String>,

    /// Test data file
    #[arg(long)]
    test: Option<String>,

    /// Field separator
    #[arg(long)]
    delimiter: Option<char>,

    /// Treat the first line of each file as data instead of a header
    #[arg(long)]
    no_header: bool,

    /// Number of feature columns
    #[arg(long)]
    inputs: Option<usize>,

    #[arg(long)]
    hidden_layers: Option<usize>,

    #[arg(long)]
    neurons_per_layer: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    #[arg(long)]
    samples_per_epoch: Option<usize>,

    /// Train a fixed number of epochs instead of until quality plateaus
    #[arg(long)]
    epochs: Option<usize>,

    /// Upper bound on plateau training epochs
    #[arg(long)]
    max_epochs: Option<usize>,

    /// Seed for weight initialization
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path))?,
            None => AppConfig::default(),
        };
        if let Some(train) = self.train {
            config.train_file = train;
        }
        if let Some(test) = self.test {
            config.test_file = test;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.no_header {
            config.skip_header = false;
        }
        if let Some(n) = self.inputs {
            config.network.inputs = n;
        }
        if let Some(n) = self.hidden_layers {
            config.network.hidden_layers = n;
        }
        if let Some(n) = self.neurons_per_layer {
            config.network.neurons_per_layer = n;
        }
        if let Some(lr) = self.learning_rate {
            config.network.learning_rate = lr;
        }
        if let Some(n) = self.samples_per_epoch {
            config.training.samples_per_epoch = n;
        }
        if let Some(epochs) = self.epochs {
            config.training.policy = StoppingPolicy::FixedEpochs { epochs };
        } else if self.max_epochs.is_some() {
            config.training.policy = StoppingPolicy::QualityPlateau {
                max_epochs: self.max_epochs,
            };
        }
        if self.seed.is_some() {
            config.network.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Args::parse().into_config()?;
    let delimiter = config.delimiter_byte()?;

    let mut train = CsvSource::open(&config.train_file, delimiter, config.skip_header)
        .with_context(|| format!("failed to read {}", config.train_file))?;
    let mut test = CsvSource::open(&config.test_file, delimiter, config.skip_header)
        .with_context(|| format!("failed to read {}", config.test_file))?;

    info!(
        train_file = %config.train_file,
        test_file = %config.test_file,
        train_records = train.len(),
        test_records = test.len(),
        policy = ?config.training.policy,
        samples_per_epoch = config.training.samples_per_epoch,
        "data loaded"
    );

    let network = Network::new(&config.network)?;
    print_model_summary(&network);

    let mut trainer = Trainer::new(network);
    let summary = trainer.train(
        config.training.policy,
        config.training.samples_per_epoch,
        &mut train,
    )?;
    print_training_history(&summary);

    let report = trainer.test(&mut test, config.training.reference)?;
    print_test_report(&report);
    Ok(())
}
