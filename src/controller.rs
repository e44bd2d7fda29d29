//! Training loops and evaluation over a data source.
use crate::config::{ReferencePopulation, StoppingPolicy};
use crate::datasets::DataSource;
use crate::error::{Error, Result};
use crate::metrics::{class_accuracy, interpret_output, Evaluation};
use crate::network::Network;
use std::fmt;
use tracing::{info, warn};

/// Outcome of a training run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSummary {
    /// Training sessions run
    pub epochs: usize,
    /// Evaluation after each session (empty for fixed-epoch runs)
    pub history: Vec<Evaluation>,
}

impl TrainingSummary {
    pub fn last(&self) -> Option<&Evaluation> {
        self.history.last()
    }
}

/// Result of a test pass, with accuracies against a reference population
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestReport {
    pub evaluation: Evaluation,
    pub reference: ReferencePopulation,
    /// Percent of the negative population not flagged
    pub negative_accuracy: f64,
    /// Percent of the positive population detected
    pub positive_accuracy: f64,
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "False positives: {} ({:.3}% of {} negatives correct)",
            self.evaluation.false_positives, self.negative_accuracy, self.reference.negatives
        )?;
        write!(
            f,
            "Undetected positives: {} ({:.3}% of {} positives detected)",
            self.evaluation.missed_positives, self.positive_accuracy, self.reference.positives
        )
    }
}

/// Drives learn/commit cycles on a network and measures the result.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    current_misclassified: usize,
    recent_misclassified: usize,
    current_error: f64,
    recent_error: f64,
    false_positives: usize,
    missed_positives: usize,
}

impl Trainer {
    pub fn new(network: Network) -> Self {
        let mut trainer = Self {
            network,
            current_misclassified: 0,
            recent_misclassified: 0,
            current_error: 0.0,
            recent_error: 0.0,
            false_positives: 0,
            missed_positives: 0,
        };
        trainer.seed_metrics();
        trainer
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Predicted class (0 or 1) for one feature vector.
    pub fn classify_record(&mut self, features: &[f64]) -> Result<u8> {
        let output = self.network.classify(features)?;
        Ok(interpret_output(&output))
    }

    /// Learn `samples` records from the start of `source`, committing after each one.
    pub fn run_training_session<S: DataSource + ?Sized>(
        &mut self,
        samples: usize,
        source: &mut S,
    ) -> Result<()> {
        source.rewind();
        for done in 0..samples {
            if !source.advance() {
                return Err(Error::Exhausted {
                    requested: samples,
                    available: done,
                });
            }
            let features = source.features()?;
            let label = source.label()? as f64;
            self.network.learn(&features, &[label])?;
            self.network.validate_learning();
        }
        Ok(())
    }

    /// Classify every record of `source` and tally the mistakes.
    pub fn evaluate<S: DataSource + ?Sized>(&mut self, source: &mut S) -> Result<Evaluation> {
        source.rewind();
        let mut evaluation = Evaluation::default();
        while source.advance() {
            let features = source.features()?;
            let label = source.label()?;
            let predicted = self.classify_record(&features)?;
            evaluation.record(predicted, label);
        }
        self.false_positives = evaluation.false_positives;
        self.missed_positives = evaluation.missed_positives;
        self.current_misclassified = evaluation.misclassified;
        self.current_error = evaluation.weighted_error();
        Ok(evaluation)
    }

    /// Train epoch after epoch while either the misclassification count or the
    /// weighted error strictly improves on the previous epoch.
    pub fn train_until_plateau<S: DataSource + ?Sized>(
        &mut self,
        samples_per_epoch: usize,
        max_epochs: Option<usize>,
        source: &mut S,
    ) -> Result<TrainingSummary> {
        self.seed_metrics();
        let mut summary = TrainingSummary::default();
        loop {
            self.roll_metrics();
            self.run_training_session(samples_per_epoch, source)?;
            let evaluation = self.evaluate(source)?;
            summary.epochs += 1;
            summary.history.push(evaluation);
            info!(
                epoch = summary.epochs,
                misclassified = evaluation.misclassified,
                weighted_error = evaluation.weighted_error(),
                "epoch evaluated"
            );

            if !self.improved() {
                break;
            }
            if max_epochs.is_some_and(|cap| summary.epochs >= cap) {
                warn!(epochs = summary.epochs, "epoch cap reached before quality plateau");
                break;
            }
        }
        info!(epochs = summary.epochs, "plateau training finished");
        Ok(summary)
    }

    /// Run exactly `epochs` training sessions without evaluating.
    pub fn train_fixed_epochs<S: DataSource + ?Sized>(
        &mut self,
        epochs: usize,
        samples_per_epoch: usize,
        source: &mut S,
    ) -> Result<TrainingSummary> {
        for _ in 0..epochs {
            self.run_training_session(samples_per_epoch, source)?;
        }
        info!(epochs, samples_per_epoch, "fixed-epoch training finished");
        Ok(TrainingSummary {
            epochs,
            history: Vec::new(),
        })
    }

    /// Train with whichever policy is configured.
    pub fn train<S: DataSource + ?Sized>(
        &mut self,
        policy: StoppingPolicy,
        samples_per_epoch: usize,
        source: &mut S,
    ) -> Result<TrainingSummary> {
        match policy {
            StoppingPolicy::QualityPlateau { max_epochs } => {
                self.train_until_plateau(samples_per_epoch, max_epochs, source)
            }
            StoppingPolicy::FixedEpochs { epochs } => {
                self.train_fixed_epochs(epochs, samples_per_epoch, source)
            }
        }
    }

    /// Evaluate once and express the mistakes against `reference`.
    pub fn test<S: DataSource + ?Sized>(
        &mut self,
        source: &mut S,
        reference: ReferencePopulation,
    ) -> Result<TestReport> {
        self.reset_tallies();
        let evaluation = self.evaluate(source)?;
        Ok(TestReport {
            evaluation,
            reference,
            negative_accuracy: class_accuracy(reference.negatives, evaluation.false_positives),
            positive_accuracy: class_accuracy(reference.positives, evaluation.missed_positives),
        })
    }

    /// False positives and missed positives of the latest evaluation.
    pub fn tallies(&self) -> (usize, usize) {
        (self.false_positives, self.missed_positives)
    }

    fn seed_metrics(&mut self) {
        self.current_misclassified = usize::MAX;
        self.recent_misclassified = usize::MAX;
        self.current_error = f64::MAX;
        self.recent_error = f64::MAX;
        self.reset_tallies();
    }

    /// Current metrics become the ones to beat.
    fn roll_metrics(&mut self) {
        self.reset_tallies();
        self.recent_misclassified = self.current_misclassified;
        self.current_misclassified = 0;
        self.recent_error = self.current_error;
        self.current_error = 0.0;
    }

    fn reset_tallies(&mut self) {
        self.false_positives = 0;
        self.missed_positives = 0;
    }

    fn improved(&self) -> bool {
        self.current_misclassified < self.recent_misclassified
            || self.current_error < self.recent_error
    }
}
