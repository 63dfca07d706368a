//! Dataset statistics, outlier detection and forking on in-memory models.

#[path = "common/catalog.rs"]
mod catalog;

use catalog::sized_model;
use ontouml_stats::dataset::Dataset;
use ontouml_stats::model::ModelMetric;
use ontouml_stats::{OutlierKind, StereotypeAllowlists, StatsError};
use pretty_assertions::assert_eq;

fn dataset(name: &str, sizes: &[(u64, u64)]) -> Dataset {
    let models = sizes
        .iter()
        .enumerate()
        .map(|(i, &(c, r))| sized_model(&format!("m{}", i + 1), 2020, false, c, r))
        .collect();
    Dataset::new(name, models).unwrap()
}

#[test]
fn test_outlier_scenario_end_to_end() {
    let allowlists = StereotypeAllowlists::default();
    let mut ds = dataset("catalog", &[(10, 5), (12, 5), (11, 5), (13, 5), (100, 5)]);

    ds.calculate_dataset_statistics(&allowlists).unwrap();
    let stats = ds.statistics().unwrap();
    assert_eq!(stats.get("class_total_q1"), Some(11.0));
    assert_eq!(stats.get("class_total_q3"), Some(13.0));
    assert_eq!(stats.get("class_total_iqr"), Some(2.0));

    let records = ds.classify_outliers().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].model, "m5");
    assert_eq!(records[0].kind, OutlierKind::Class);
    assert_eq!(records[0].kind.to_string(), "class");

    let outliers = ds.identify_outliers().unwrap();
    let mut fork = ds.fork_without_outliers(&outliers);
    assert_eq!(fork.name, "catalog_filtered");
    assert_eq!(fork.num_models(), 4);

    fork.calculate_dataset_statistics(&allowlists).unwrap();
    assert_eq!(fork.statistics().unwrap().get("class_total_max"), Some(13.0));
    assert_eq!(ds.statistics().unwrap().get("class_total_max"), Some(100.0));
}

#[test]
fn test_outliers_before_statistics_fail() {
    let ds = dataset("catalog", &[(1, 1), (2, 2)]);

    assert!(matches!(
        ds.identify_outliers(),
        Err(StatsError::StatisticsNotComputed { .. })
    ));
}

#[test]
fn test_zero_relation_model_is_still_classified() {
    let allowlists = StereotypeAllowlists::default();
    let mut ds = dataset("catalog", &[(10, 5), (12, 5), (11, 5), (13, 5), (100, 0)]);

    let failed = ds.calculate_models_statistics(&allowlists);
    assert!(failed.is_empty());
    let ratio = ds.models()[4]
        .statistic(ModelMetric::ClassToRelationRatio)
        .unwrap();
    assert!(ratio.is_nan());

    ds.calculate_dataset_statistics(&allowlists).unwrap();
    let records = ds.classify_outliers().unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].model, "m5");
    assert_eq!(records[0].kind, OutlierKind::ClassAndRelation);
    assert!(records[0].class_relation_ratio.is_nan());

    let table = ds.models_statistics_table();
    let idx = table.column_index("class_to_relation_ratio").unwrap();
    assert_eq!(table.rendered_rows()[4][idx], "N/A");
}

#[test]
fn test_datasets_do_not_share_state() {
    let allowlists = StereotypeAllowlists::default();
    let sizes = [(10, 4), (20, 8), (30, 12)];
    let mut full = dataset("full", &sizes);
    full.calculate_models_statistics(&allowlists);

    let mut reduced = full.fork_without_outliers(&["m2"]);
    reduced.calculate_models_statistics(&allowlists);
    full.calculate_dataset_statistics(&allowlists).unwrap();
    reduced.calculate_dataset_statistics(&allowlists).unwrap();

    assert_eq!(full.num_models(), reduced.num_models() + 1);
    for name in ["m1", "m3"] {
        let kept = reduced.model(name).unwrap();
        assert!(full.model(name).unwrap().same_statistics(kept));
        assert!(kept
            .statistic(ModelMetric::NonStereotypedClassToRelationRatio)
            .is_some_and(f64::is_nan));
    }

    // resetting one side leaves the other intact
    reduced.reset_statistics();
    assert!(reduced.model("m1").unwrap().statistics().is_empty());
    assert!(!full.model("m1").unwrap().statistics().is_empty());
    assert_eq!(full.statistics().unwrap().get("total_classes"), Some(60.0));
}

#[test]
fn test_empty_dataset_pipeline() {
    let allowlists = StereotypeAllowlists::default();
    let mut ds = Dataset::new("empty", Vec::new()).unwrap();

    ds.calculate_dataset_statistics(&allowlists).unwrap();
    assert!(ds.identify_outliers().unwrap().is_empty());
    assert_eq!(ds.fork_without_outliers::<&str>(&[]).num_models(), 0);
}
