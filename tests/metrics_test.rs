mod test_signals;

use approx::assert_relative_eq;
use myotwitch::config::TwitchConfig;
use myotwitch::metrics::ColumnKey;
use myotwitch::{MetricId, compute_metrics, detect_twitches};
use test_signals::generate_twitch_trace;

fn detect_and_compute(
    num_cycles: usize,
    amplitude: f64,
    requested: &[MetricId],
    config: &TwitchConfig,
) -> anyhow::Result<(myotwitch::PerTwitchTable, myotwitch::AggregateTable)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let trace = generate_twitch_trace(num_cycles, amplitude, 10.0);
    let (peaks, valleys) = detect_twitches(&trace, config)?;
    Ok(compute_metrics(&peaks, &valleys, &trace, requested, config)?)
}

#[test]
fn test_end_to_end_metrics_on_twitch_train() {
    let config = TwitchConfig::default();
    let (per_twitch, aggregate) =
        detect_and_compute(8, 2.0, &MetricId::ALL, &config).expect("pipeline failed");

    // 8 peaks, 7 interior valleys: 6 twitches
    assert_eq!(per_twitch.num_rows(), 6);

    // every requested metric produced its columns
    for metric in MetricId::ALL {
        assert!(
            aggregate.column_keys().any(|k| k.metric == metric),
            "missing columns for {metric}"
        );
    }

    // identical raised-cosine twitches, 0.5 s apart
    let amplitude = aggregate
        .column(&ColumnKey::scalar(MetricId::Amplitude))
        .unwrap();
    assert_relative_eq!(amplitude.mean.unwrap(), 1.8, epsilon = 1e-6);
    assert_relative_eq!(amplitude.std_dev.unwrap(), 0.0, epsilon = 1e-6);

    let period = aggregate
        .column(&ColumnKey::scalar(MetricId::Period))
        .unwrap();
    assert_eq!(period.n, 6);
    assert_relative_eq!(period.mean.unwrap(), 0.5, epsilon = 1e-9);

    let frequency = aggregate
        .column(&ColumnKey::scalar(MetricId::Frequency))
        .unwrap();
    assert_relative_eq!(frequency.mean.unwrap(), 2.0, epsilon = 1e-9);

    // periodic train: interior irregularity is zero, ends absent
    let irregularity_key = ColumnKey::scalar(MetricId::Irregularity);
    let irregularity = per_twitch.column(&irregularity_key).unwrap();
    assert_eq!(irregularity.first().copied().flatten(), None);
    assert_eq!(irregularity.last().copied().flatten(), None);
    assert_relative_eq!(irregularity[2].unwrap(), 0.0, epsilon = 1e-9);
    assert_eq!(aggregate.column(&irregularity_key).unwrap().n, 6);

    // width columns expand per configured percentage
    for &percent in &config.metrics.width_percentages {
        let key = ColumnKey::with_width(MetricId::Width, percent);
        assert!(per_twitch.column(&key).is_some(), "missing width@{percent}");
    }
}

#[test]
fn test_widths_scale_with_percentage() {
    let config = TwitchConfig::default();
    let (per_twitch, _) = detect_and_compute(6, 2.0, &[MetricId::Width], &config).unwrap();

    let narrow = per_twitch
        .column(&ColumnKey::with_width(MetricId::Width, 10))
        .unwrap()[0]
        .unwrap();
    let wide = per_twitch
        .column(&ColumnKey::with_width(MetricId::Width, 90))
        .unwrap()[0]
        .unwrap();
    assert!(narrow < wide);
    // a raised cosine at 50% spans exactly half the 0.5 s cycle
    let half = per_twitch
        .column(&ColumnKey::with_width(MetricId::Width, 50))
        .unwrap()[0]
        .unwrap();
    assert_relative_eq!(half, 0.25, epsilon = 1e-3);
}

#[test]
fn test_omitting_a_metric_leaves_others_unchanged() {
    let config = TwitchConfig::default();
    let all = detect_and_compute(6, 2.0, &MetricId::ALL, &config).unwrap();
    let without_auc: Vec<MetricId> = MetricId::ALL
        .into_iter()
        .filter(|&m| m != MetricId::AreaUnderCurve)
        .collect();
    let reduced = detect_and_compute(6, 2.0, &without_auc, &config).unwrap();

    // AUC columns are gone
    assert!(
        !reduced
            .1
            .column_keys()
            .any(|k| k.metric == MetricId::AreaUnderCurve)
    );

    // every other column is numerically unchanged
    for key in reduced.1.column_keys() {
        assert_eq!(
            reduced.1.column(key).unwrap(),
            all.1.column(key).unwrap(),
            "aggregate column {key:?} changed"
        );
    }
    for key in reduced.0.column_keys() {
        assert_eq!(
            reduced.0.column(key).unwrap(),
            all.0.column(key).unwrap(),
            "per-twitch column {key:?} changed"
        );
    }
}

#[test]
fn test_failing_metric_is_skipped_not_fatal() {
    let mut config = TwitchConfig::default();
    // out-of-range percentage: width-family providers report unavailable
    config.metrics.width_percentages = vec![150];

    let (per_twitch, aggregate) =
        detect_and_compute(6, 2.0, &MetricId::ALL, &config).expect("run must not abort");

    for metric in [
        MetricId::Width,
        MetricId::ContractionTime,
        MetricId::RelaxationTime,
    ] {
        assert!(
            !aggregate.column_keys().any(|k| k.metric == metric),
            "{metric} should have been skipped"
        );
    }
    // scalar metrics are unaffected
    assert!(
        per_twitch
            .column(&ColumnKey::scalar(MetricId::Amplitude))
            .is_some()
    );
    assert!(
        aggregate
            .column(&ColumnKey::scalar(MetricId::Period))
            .is_some()
    );
}

#[test]
fn test_sequencing_failure_aborts_metric_run() {
    let trace = generate_twitch_trace(4, 2.0, 10.0);
    let config = TwitchConfig::default();

    // two peaks with no valley between them
    let result = compute_metrics(&[25, 30], &[], &trace, &MetricId::ALL, &config);
    assert!(matches!(
        result,
        Err(myotwitch::TwitchError::TooFewValleys { .. })
    ));

    let result = compute_metrics(&[25, 75], &[40, 60], &trace, &MetricId::ALL, &config);
    assert!(matches!(
        result,
        Err(myotwitch::TwitchError::TwoValleysInARow {
            first: 40,
            second: 60
        })
    ));
}

#[test]
fn test_rounded_statistics_are_integral() {
    let mut config = TwitchConfig::default();
    config.metrics.rounded = true;

    let (_, aggregate) =
        detect_and_compute(6, 200.0, &[MetricId::Amplitude], &config).unwrap();
    let stats = aggregate
        .column(&ColumnKey::scalar(MetricId::Amplitude))
        .unwrap();
    let mean = stats.mean.unwrap();
    assert_eq!(mean, mean.round());
    assert!(mean > 0.0);
}
