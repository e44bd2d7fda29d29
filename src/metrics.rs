//! Decision rule and classification-quality tallies.

/// Outputs at or above this value are read as the positive class.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Weight of a missed positive relative to a false positive.
pub const MISSED_POSITIVE_WEIGHT: f64 = 3.0;

/// Map a network output vector to a class label (0 or 1) using its first value.
pub fn interpret_output(output: &[f64]) -> u8 {
    match output.first() {
        Some(&v) if v >= DECISION_THRESHOLD => 1,
        _ => 0,
    }
}

/// False positives plus missed positives weighted by [`MISSED_POSITIVE_WEIGHT`].
pub fn weighted_error_score(false_positives: usize, missed_positives: usize) -> f64 {
    false_positives as f64 + MISSED_POSITIVE_WEIGHT * missed_positives as f64
}

/// Percentage of a reference population classified correctly given `errors`
/// mistakes in it.
pub fn class_accuracy(population: usize, errors: usize) -> f64 {
    if population == 0 {
        return 0.0;
    }
    (population as f64 - errors as f64) * 100.0 / population as f64
}

/// Results of one pass over a data source
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Evaluation {
    /// Predicted 1, labelled 0
    pub false_positives: usize,
    /// Predicted 0, labelled 1
    pub missed_positives: usize,
    /// Every record whose prediction differs from its label
    pub misclassified: usize,
    /// Records seen
    pub records: usize,
}

impl Evaluation {
    /// Count one prediction against its label. Sources only hand out 0 or 1;
    /// any other label counts as a miss on the side of the prediction.
    pub fn record(&mut self, predicted: u8, label: i64) {
        self.records += 1;
        if i64::from(predicted) == label {
            return;
        }
        self.misclassified += 1;
        if predicted == 0 {
            self.missed_positives += 1;
        } else {
            self.false_positives += 1;
        }
    }

    pub fn weighted_error(&self) -> f64 {
        weighted_error_score(self.false_positives, self.missed_positives)
    }

    /// Fraction of records classified correctly, 0 for an empty pass.
    pub fn accuracy(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        (self.records - self.misclassified) as f64 / self.records as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary() {
        assert_eq!(interpret_output(&[0.5]), 1);
        assert_eq!(interpret_output(&[0.49999]), 0);
        assert_eq!(interpret_output(&[-3.0, 9.0]), 0);
        assert_eq!(interpret_output(&[]), 0);
    }

    #[test]
    fn weighted_error_law() {
        let mut eval = Evaluation::default();
        for _ in 0..4 {
            eval.record(1, 0);
        }
        for _ in 0..7 {
            eval.record(0, 1);
        }
        eval.record(1, 1);
        eval.record(0, 0);
        assert_eq!(eval.false_positives, 4);
        assert_eq!(eval.missed_positives, 7);
        assert_eq!(eval.misclassified, 11);
        assert_eq!(eval.records, 13);
        assert_eq!(eval.weighted_error(), 4.0 + 3.0 * 7.0);
        assert_eq!(weighted_error_score(0, 0), 0.0);
    }

    #[test]
    fn accuracy_helpers() {
        assert_eq!(class_accuracy(200, 50), 75.0);
        assert_eq!(class_accuracy(0, 0), 0.0);
        let mut eval = Evaluation::default();
        assert_eq!(eval.accuracy(), 0.0);
        eval.record(1, 1);
        eval.record(1, 0);
        assert_eq!(eval.accuracy(), 0.5);
    }
}
