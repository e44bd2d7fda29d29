//! Reporting helpers and small fixtures.
use crate::controller::{TestReport, TrainingSummary};
use crate::datasets::MemorySource;
use crate::network::Network;

/// The four XOR rows, labelled 0/1.
pub fn xor_dataset() -> MemorySource {
    MemorySource::new(vec![
        (vec![0.0, 0.0], 0),
        (vec![0.0, 1.0], 1),
        (vec![1.0, 0.0], 1),
        (vec![1.0, 1.0], 0),
    ])
}

/// Print model summary
pub fn print_model_summary(network: &Network) {
    println!("Model Summary:\n{}", network);
}

/// Print per-epoch evaluation table
pub fn print_training_history(summary: &TrainingSummary) {
    println!("\nTraining Summary ({} epochs):", summary.epochs);
    if summary.history.is_empty() {
        return;
    }
    println!("+-------+---------------+----------------+");
    println!("| Epoch | Misclassified | Weighted Error |");
    println!("+-------+---------------+----------------+");
    for (epoch, eval) in summary.history.iter().enumerate() {
        println!(
            "| {:>5} | {:>13} | {:>14.1} |",
            epoch + 1,
            eval.misclassified,
            eval.weighted_error()
        );
    }
    println!("+-------+---------------+----------------+");
}

/// Print the two summary lines of a test pass
pub fn print_test_report(report: &TestReport) {
    println!("{}", report);
}
