//! End-to-end training scenarios

use fraud_mlp::{
    xor_dataset, CsvSource, DataSource, Error, MemorySource, Network, NetworkConfig,
    ReferencePopulation, StoppingPolicy, Trainer,
};

fn xor_trainer(seed: u64) -> Trainer {
    let config = NetworkConfig::new(2, 1, 1, 2).with_seed(seed);
    Trainer::new(Network::new(&config).unwrap())
}

/// Fixed-epoch training learns XOR well enough to get at least 3 of 4 rows right
#[test]
fn test_xor_fixed_epochs_converges() {
    for seed in [1, 7, 2024] {
        let mut trainer = xor_trainer(seed);
        let mut data = xor_dataset();
        let summary = trainer.train_fixed_epochs(3000, 4, &mut data).unwrap();
        assert_eq!(summary.epochs, 3000);

        let eval = trainer.evaluate(&mut data).unwrap();
        assert_eq!(eval.records, 4);
        assert!(
            eval.accuracy() >= 0.75,
            "seed {} reached only {:.2}",
            seed,
            eval.accuracy()
        );
    }
}

/// Classification is repeatable while weights are frozen
#[test]
fn test_classify_is_deterministic_between_commits() {
    let mut trainer = xor_trainer(3);
    let mut data = xor_dataset();
    trainer.train_fixed_epochs(10, 4, &mut data).unwrap();

    let net = trainer.network_mut();
    let first = net.classify(&[1.0, 0.0]).unwrap();
    for _ in 0..5 {
        assert_eq!(net.classify(&[1.0, 0.0]).unwrap(), first);
    }
    assert_eq!(first.len(), 1);
    assert!(first[0].is_finite());
}

/// With every label 0 the untrained output (exactly 0) never changes, so the
/// second epoch repeats the first and training stops there
#[test]
fn test_plateau_stops_after_stagnant_epoch() {
    let mut trainer = xor_trainer(11);
    let mut data = MemorySource::new(vec![
        (vec![0.0, 0.0], 0),
        (vec![0.3, 0.9], 0),
        (vec![1.0, 0.2], 0),
    ]);
    let summary = trainer
        .train(StoppingPolicy::QualityPlateau { max_epochs: None }, 3, &mut data)
        .unwrap();
    assert_eq!(summary.epochs, 2);
    assert_eq!(summary.history[0], summary.history[1]);
    assert_eq!(summary.history[1].misclassified, 0);
    assert_eq!(summary.history[1].weighted_error(), 0.0);
}

/// Plateau training on XOR always terminates and records every epoch
#[test]
fn test_plateau_on_xor_terminates() {
    let mut trainer = xor_trainer(5);
    let mut data = xor_dataset().repeated(50);
    let summary = trainer.train_until_plateau(200, Some(500), &mut data).unwrap();
    assert!(summary.epochs >= 2);
    assert_eq!(summary.history.len(), summary.epochs);
}

/// Hidden layers deeper than one still train and stay finite
#[test]
fn test_deep_network_trains() {
    let config = NetworkConfig::new(2, 1, 3, 4).with_seed(9);
    let mut trainer = Trainer::new(Network::new(&config).unwrap());
    let mut data = xor_dataset();
    trainer.train_fixed_epochs(200, 4, &mut data).unwrap();
    let net = trainer.network_mut();
    for input in [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]] {
        let out = net.classify(&input).unwrap();
        assert!(out[0].is_finite());
    }
}

/// Training and testing from delimited text
#[test]
fn test_csv_train_and_report() {
    let mut text = String::from("x1;x2;Class\n");
    for _ in 0..25 {
        text.push_str("0;0;0\n0;1;1\n1;0;1\n1;1;0\n");
    }
    let mut train = CsvSource::from_reader(text.as_bytes(), b';', true).unwrap();
    assert_eq!(train.len(), 100);

    let mut trainer = xor_trainer(7);
    trainer
        .train(StoppingPolicy::FixedEpochs { epochs: 120 }, 100, &mut train)
        .unwrap();

    let reference = ReferencePopulation {
        negatives: 50,
        positives: 50,
    };
    let report = trainer.test(&mut train, reference).unwrap();
    assert_eq!(report.evaluation.records, 100);
    let fp = report.evaluation.false_positives as f64;
    let mp = report.evaluation.missed_positives as f64;
    assert_eq!(report.evaluation.weighted_error(), fp + 3.0 * mp);
    assert_eq!(report.negative_accuracy, (50.0 - fp) * 100.0 / 50.0);
    assert_eq!(report.positive_accuracy, (50.0 - mp) * 100.0 / 50.0);
}

/// A bad field aborts the session instead of being skipped
#[test]
fn test_malformed_record_aborts_training() {
    let text = "a;b;c\n0;1;1\n0;oops;1\n";
    let mut train = CsvSource::from_reader(text.as_bytes(), b';', true).unwrap();
    let mut trainer = xor_trainer(1);
    let err = trainer.run_training_session(2, &mut train).unwrap_err();
    assert!(matches!(err, Error::Parse { record: 2, field: 1, .. }));

    train.rewind();
    assert!(train.advance());
    assert_eq!(train.label().unwrap(), 1);
}

/// Asking for more samples than exist is surfaced to the caller
#[test]
fn test_short_source_fails_session() {
    let mut trainer = xor_trainer(1);
    let mut data = xor_dataset();
    let err = trainer.train_fixed_epochs(1, 5, &mut data).unwrap_err();
    assert!(matches!(err, Error::Exhausted { requested: 5, available: 4 }));
}
