//! End-to-end dashboard tests over files on disk

use phone_usage::config::DashboardConfig;
use phone_usage::dashboard::{Dashboard, Outcome};
use phone_usage::error::ViewError;
use phone_usage::form::UsageForm;
use phone_usage::report::ReportEncoder;
use phone_usage::CategoryTableVersion;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DATASET_CSV: &str = "\
User ID,Age,Gender,Screen Time (hrs/day),Data Usage (GB/month),Gaming Time (hrs/day),Primary Use,cluster_kmeans
U1,21,Male,8.0,40,3.0,1,0
U2,34,Female,4.0,20,0.5,3,1
U3,29,Other,6.0,30,1.0,1,0
U4,45,Male,2.0,10,0.0,5,1
U5,23,Female,,,2.0,,0
";

// Screen time <= 5 -> Professional; otherwise gaming <= 2 -> Social Media, else Gaming
const MODEL_JSON: &str = r#"{
    "model_name": "primary_use_tree",
    "n_features": 12,
    "classes": [0, 1, 2, 3],
    "nodes": {
        "feature":        [2,   -2,  9,   -2,  -2],
        "threshold":      [5.0, -2.0, 2.0, -2.0, -2.0],
        "children_left":  [1,   -1,  3,   -1,  -1],
        "children_right": [2,   -1,  4,   -1,  -1],
        "value": [
            [10.0, 10.0, 10.0, 10.0],
            [0.0, 1.0, 0.0, 9.0],
            [10.0, 9.0, 10.0, 1.0],
            [8.0, 0.0, 1.0, 1.0],
            [2.0, 9.0, 1.0, 0.0]
        ]
    }
}"#;

fn write_fixture(dir: &Path, dataset: Option<&str>, model: Option<&str>) -> DashboardConfig {
    let dataset_path = dir.join("clustering_results.csv");
    let model_path = dir.join("decision_tree_model.json");
    if let Some(csv) = dataset {
        fs::write(&dataset_path, csv).unwrap();
    }
    if let Some(json) = model {
        fs::write(&model_path, json).unwrap();
    }
    DashboardConfig {
        dataset_path,
        model_path,
        ..DashboardConfig::default()
    }
}

fn open_full() -> (TempDir, Dashboard) {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path(), Some(DATASET_CSV), Some(MODEL_JSON));
    (dir, Dashboard::open(config))
}

#[test]
fn test_overview_from_disk() {
    let (_dir, dashboard) = open_full();

    let metrics = dashboard.overview().unwrap();
    assert_eq!(metrics.total_users, 5);
    assert_eq!(metrics.avg_screen_time_hours, Some(5.0));
    assert_eq!(metrics.avg_data_usage_gb, Some(25.0));
    assert_eq!(metrics.most_common_code, Some(1));
    assert_eq!(metrics.most_common_use, "Gaming");
}

#[test]
fn test_distribution_skips_missing() {
    let (_dir, dashboard) = open_full();

    let distribution = dashboard
        .distribution("Screen Time (hrs/day)", Some(3))
        .unwrap();
    let histogram = distribution.histogram.unwrap();
    assert_eq!(distribution.missing, 1);
    assert_eq!(histogram.total, 4);
    assert_eq!(histogram.bins.len(), 3);
    assert_eq!(histogram.bins.iter().map(|b| b.count).sum::<usize>(), 4);

    assert!(matches!(
        dashboard.distribution("Height", None),
        Err(ViewError::UnknownFeature { .. })
    ));
}

#[test]
fn test_distribution_bin_count_is_bounded() {
    let (_dir, dashboard) = open_full();

    assert!(matches!(
        dashboard.distribution("Screen Time (hrs/day)", Some(usize::MAX)),
        Err(ViewError::InvalidBins { .. })
    ));
    assert!(matches!(
        dashboard.distribution("Streaming Time (hrs/day)", None),
        Err(ViewError::MissingColumn { .. })
    ));
}

#[test]
fn test_cluster_missing_use_wins_tie() {
    let csv = "\
Screen Time (hrs/day),Data Usage (GB/month),Primary Use,cluster_kmeans
3.0,10,,0
4.0,12,1,0
";
    let dir = tempfile::tempdir().unwrap();
    let dashboard = Dashboard::open(write_fixture(dir.path(), Some(csv), None));

    let view = dashboard.clusters(None).unwrap();
    assert_eq!(view.summaries[0].most_common_use, "Unknown Category");
    assert_eq!(dashboard.overview().unwrap().most_common_code, None);
}

#[test]
fn test_clusters_summaries() {
    let (_dir, dashboard) = open_full();

    let view = dashboard.clusters(None).unwrap();
    assert_eq!(view.column, "cluster_kmeans");
    // U5 has no screen time or data usage and is not plotted
    assert_eq!(view.points.len(), 4);

    let summary: Vec<(i64, usize, &str)> = view
        .summaries
        .iter()
        .map(|s| (s.cluster, s.users, s.most_common_use.as_str()))
        .collect();
    assert_eq!(summary, vec![(0, 3, "Gaming"), (1, 2, "Professional")]);
}

#[test]
fn test_predict_form_end_to_end() {
    let (_dir, dashboard) = open_full();
    assert!(dashboard.prediction_available());

    let defaults = dashboard.predict_form(UsageForm::default());
    assert_eq!(
        defaults,
        Outcome::Predicted {
            code: 3,
            category: "Professional".to_string()
        }
    );

    let gamer = dashboard.predict_form(UsageForm {
        screen_time: Some(8.0),
        gaming: Some(3.0),
        ..Default::default()
    });
    assert_eq!(gamer.message(), "Predicted Primary Use: Gaming");

    let casual = UsageForm::from_json(r#"{"screen_time": 8.0, "gaming": 0.5, "os": "iOS"}"#)
        .unwrap();
    assert_eq!(
        dashboard.predict_form(casual).message(),
        "Predicted Primary Use: Social Media"
    );
}

#[test]
fn test_predict_rejects_over_budget() {
    let (_dir, dashboard) = open_full();

    let outcome = dashboard.predict_form(UsageForm {
        screen_time: Some(20.0),
        gaming: Some(5.0),
        ..Default::default()
    });

    assert!(!outcome.is_success());
    assert!(matches!(outcome, Outcome::Rejected { .. }));
    assert_eq!(
        outcome.message(),
        "Total time across activities exceeds 24 hours. Please adjust your inputs."
    );
}

#[test]
fn test_missing_model_degrades_to_exploration_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path(), Some(DATASET_CSV), None);
    let dashboard = Dashboard::open(config);

    assert!(!dashboard.prediction_available());
    assert!(dashboard.classifier_error().is_some());
    assert_eq!(dashboard.overview().unwrap().total_users, 5);

    let outcome = dashboard.predict_form(UsageForm::default());
    assert!(matches!(outcome, Outcome::Failed { .. }));
    assert!(outcome.hint().unwrap().contains("usage doctor"));

    let status = dashboard.status();
    assert!(status.iter().any(|c| c.name == "dataset" && c.available));
    assert!(status.iter().any(|c| c.name == "classifier" && !c.available));
}

#[test]
fn test_missing_dataset_keeps_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path(), None, Some(MODEL_JSON));
    let dashboard = Dashboard::open(config);

    assert!(matches!(
        dashboard.overview(),
        Err(ViewError::DatasetUnavailable(_))
    ));
    assert!(dashboard.predict_form(UsageForm::default()).is_success());
}

#[test]
fn test_wrong_width_model_is_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let narrow = MODEL_JSON.replace(r#""n_features": 12"#, r#""n_features": 11"#);
    let config = write_fixture(dir.path(), Some(DATASET_CSV), Some(&narrow));
    let dashboard = Dashboard::open(config);

    assert!(!dashboard.prediction_available());
}

#[test]
fn test_legacy_table_has_no_communication() {
    let csv = "\
Screen Time (hrs/day),Data Usage (GB/month),Primary Use,cluster_kmeans
3.0,10,5,0
4.0,12,5,0
7.0,50,0,1
";
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_fixture(dir.path(), Some(csv), Some(MODEL_JSON));

    let full = Dashboard::open(config.clone());
    assert_eq!(full.overview().unwrap().most_common_use, "Communication");

    config.category_table = CategoryTableVersion::Legacy;
    let legacy = Dashboard::open(config);
    assert_eq!(legacy.overview().unwrap().most_common_use, "Unknown Category");

    let view = legacy.clusters(Some("cluster_kmeans")).unwrap();
    assert_eq!(view.summaries[0].most_common_use, "Category 5");
    assert_eq!(view.summaries[1].most_common_use, "Social Media");
}

#[test]
fn test_config_file_drives_open() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path(), Some(DATASET_CSV), Some(MODEL_JSON));
    let config_path = dir.path().join("dashboard.json");
    fs::write(
        &config_path,
        serde_json::json!({
            "dataset_path": fixture.dataset_path,
            "model_path": fixture.model_path,
            "histogram_bins": 2,
        })
        .to_string(),
    )
    .unwrap();

    let dashboard = Dashboard::open(DashboardConfig::load(&config_path).unwrap());
    let distribution = dashboard.distribution("Gaming Time (hrs/day)", None).unwrap();
    assert_eq!(distribution.histogram.unwrap().bins.len(), 2);
}

#[test]
fn test_report_envelope_for_view() {
    let (_dir, dashboard) = open_full();
    let encoder = ReportEncoder::with_instance_id("it".to_string());

    let json = encoder
        .encode_to_json("overview", dashboard.overview().unwrap())
        .unwrap();
    let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(payload["view"], "overview");
    assert_eq!(payload["data"]["total_users"], 5);
    assert_eq!(payload["data"]["most_common_use"], "Gaming");
}
