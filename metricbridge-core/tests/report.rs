use approx::assert_relative_eq;
use metricbridge_core::{
    error::Error,
    metrics::{
        Mae, Metric, RegressionErrorBiasTable, RegressionErrorDistribution,
        RegressionPredictedVsActualScatter,
    },
    parsers::{CsvParser, TableParser},
    render::WidgetKind,
    DataDefinition, Dataset, Report, Snapshot,
};

fn table(target: &[f64], prediction: &[f64]) -> Dataset {
    Dataset::from_columns(
        vec![
            ("target".to_owned(), target.to_vec().into()),
            ("prediction".to_owned(), prediction.to_vec().into()),
            (
                "age".to_owned(),
                vec![23.0, 31.0, 45.0, 52.0, 38.0, 61.0, 29.0, 47.0].into(),
            ),
            (
                "income".to_owned(),
                vec![32.0, 48.0, 75.0, 91.0, 56.0, 104.0, 41.0, 80.0].into(),
            ),
        ],
        DataDefinition::new(),
    )
    .unwrap()
}

fn current() -> Dataset {
    table(
        &[10.0, 12.0, 15.0, 18.0, 20.0, 22.0, 25.0, 30.0],
        &[11.0, 11.5, 16.0, 17.0, 21.5, 21.0, 27.0, 28.0],
    )
}

fn reference() -> Dataset {
    table(
        &[11.0, 13.0, 14.0, 19.0, 21.0, 23.0, 24.0, 31.0],
        &[11.5, 12.0, 15.0, 18.5, 20.0, 24.0, 25.5, 30.0],
    )
}

fn all_metrics() -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(RegressionErrorBiasTable::new().with_columns(&["age"])),
        Box::new(RegressionErrorDistribution::default()),
        Box::new(RegressionPredictedVsActualScatter::default()),
        Box::new(Mae::default()),
    ]
}

#[test]
fn report_with_reference() {
    let snapshot = Report::new(all_metrics())
        .run(&current(), Some(&reference()))
        .unwrap();

    assert!(snapshot.has_reference());
    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.failures().count(), 0);

    for name in [
        "RegressionErrorBiasTable",
        "RegressionErrorDistribution",
        "RegressionPredictedVsActualScatter",
        "MAE",
    ] {
        let result = snapshot.get_metric_result(name).unwrap();
        assert!(result.current.value >= 0.0, "{name} is negative");
    }

    let bias = snapshot
        .get_metric_result("RegressionErrorBiasTable")
        .unwrap();
    assert_relative_eq!(bias.current.value, 1.0);
    assert!(bias.reference.is_none());
    assert_eq!(bias.current.widgets.len(), 1);
    assert_eq!(bias.current.widgets[0].kind, WidgetKind::Table);

    let scatter = snapshot
        .get_metric_result("RegressionPredictedVsActualScatter")
        .unwrap();
    assert_relative_eq!(scatter.current.value, 8.0);

    let mae = snapshot.get_metric_result("MAE").unwrap();
    assert_relative_eq!(mae.current.value, 1.25);
    assert!(mae.reference.is_some());
}

#[test]
fn column_selection_changes_feature_count() {
    let narrow = RegressionErrorBiasTable::new().with_columns(&["age"]);
    let wide = RegressionErrorBiasTable::new().with_columns(&["age", "income"]);
    let report = Report::new(vec![Box::new(narrow.clone()), Box::new(wide.clone())]);

    let snapshot = report.run(&current(), Some(&reference())).unwrap();
    let values: Vec<f64> = snapshot
        .metrics()
        .map(|item| item.result().unwrap().current.value)
        .collect();
    assert_eq!(values, vec![1.0, 2.0]);

    let all_features = Report::new(vec![Box::new(RegressionErrorBiasTable::new())])
        .run(&current(), None)
        .unwrap();
    assert_relative_eq!(
        all_features
            .get_metric_result("RegressionErrorBiasTable")
            .unwrap()
            .current
            .value,
        2.0
    );
}

#[test]
fn report_without_reference() {
    let snapshot = Report::new(all_metrics()).run(&current(), None).unwrap();
    assert!(!snapshot.has_reference());
    assert_eq!(snapshot.failures().count(), 0);
    assert!(snapshot.get_metric_result("MAE").unwrap().reference.is_none());
}

#[test]
fn report_is_deterministic() {
    let report = Report::new(all_metrics());
    let first = report.run(&current(), Some(&reference())).unwrap();
    let second = report.run(&current(), Some(&reference())).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn invalid_parameter_does_not_affect_siblings() {
    let report = Report::new(vec![
        Box::new(RegressionErrorBiasTable::new().with_top_error(0.75)),
        Box::new(RegressionErrorBiasTable::new().with_top_error(0.25)),
    ]);
    let snapshot = report.run(&current(), None).unwrap();

    let items: Vec<_> = snapshot.metrics().collect();
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0].result(), Err(Error::MetricFailed { .. })));
    assert!(items[1].result().unwrap().current.value >= 0.0);
}

#[test]
fn snapshot_serialization() {
    let snapshot = Report::new(all_metrics())
        .run(&current(), Some(&reference()))
        .unwrap();

    let json = snapshot.to_json().unwrap();
    assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);

    let binary = snapshot.serialize_binary().unwrap();
    let restored = Snapshot::create_from_binary(&binary).unwrap();
    assert_eq!(restored.len(), snapshot.len());
    assert_relative_eq!(
        restored.get_metric_result("MAE").unwrap().current.value,
        1.25
    );

    assert!(Snapshot::from_json("{").is_err());
}

#[test]
fn report_over_parsed_csv() {
    let csv = "target,prediction,city\n1,1.5,paris\n2,2,berlin\n3,2,paris\n4,4.5,rome\n";
    let dataset = CsvParser::default()
        .parse_table(csv, DataDefinition::new())
        .unwrap();

    let snapshot = Report::create_from_json(
        r#"{"metrics": [{"typename": "RegressionErrorBiasTable", "config": {"topError": 0.25}}, {"typename": "MAE"}]}"#,
    )
    .unwrap()
    .run(&dataset, None)
    .unwrap();

    assert_relative_eq!(
        snapshot
            .get_metric_result("RegressionErrorBiasTable")
            .unwrap()
            .current
            .value,
        1.0
    );
    assert_relative_eq!(snapshot.get_metric_result("MAE").unwrap().current.value, 0.5);
}

#[test]
fn non_finite_cells_keep_snapshot_readable() {
    let csv = "target,prediction\n1,inf\n2,2\n3,3.5\n4,-inf\n";
    let dataset = CsvParser::default()
        .parse_table(csv, DataDefinition::new())
        .unwrap();

    let snapshot = Report::new(vec![
        Box::new(Mae::default()),
        Box::new(RegressionErrorDistribution::default()),
    ])
    .run(&dataset, None)
    .unwrap();

    let mae = snapshot.get_metric_result("MAE").unwrap().current.value;
    assert_relative_eq!(mae, 0.25);

    let restored = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(restored, snapshot);
}
