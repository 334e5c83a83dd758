use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use sales_forecast::models::{load_model, parse_model, Node, TreeEnsemble};
use sales_forecast::{Covariates, FeatureVector, ForecastError, Regressor, Series, FEATURE_NAMES};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn schema() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

fn features(values: &[f64], holiday: f64) -> FeatureVector {
    let start = NaiveDate::from_ymd_opt(2023, 11, 6).unwrap();
    let points: Vec<(NaiveDate, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (start + Duration::weeks(i as i64), v))
        .collect();
    let covariates = Covariates::from_array([holiday, 50.0, 3.0, 210.0, 7.0]);
    let series = Series::from_values("1", &points, covariates).unwrap();
    FeatureVector::from_window(series.observations()).unwrap()
}

/// Two trees: one on rolling_4, one on Holiday_Flag (index 7)
fn ensemble_json() -> serde_json::Value {
    json!({
        "kind": "tree_ensemble",
        "name": "weekly_sales_xgb",
        "base_score": 1000.0,
        "feature_names": FEATURE_NAMES,
        "trees": [
            [
                {"split": 3, "threshold": 500.0, "yes": 1, "no": 2},
                {"leaf": -100.0},
                {"leaf": 250.0}
            ],
            [
                {"split": 7, "threshold": 0.5, "yes": 1, "no": 2, "missing": 1},
                {"leaf": 0.0},
                {"leaf": 75.5}
            ]
        ],
        "feature_importances": [0.1, 0.05, 0.05, 0.5, 0.02, 0.02, 0.01, 0.2, 0.02, 0.01, 0.01, 0.01]
    })
}

fn write_model(value: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file
}

#[test]
fn test_load_tree_ensemble() {
    let file = write_model(&ensemble_json());
    let model = load_model(file.path()).unwrap();

    assert_eq!(model.name(), "weekly_sales_xgb");
    assert_eq!(model.feature_names().unwrap(), schema().as_slice());

    let quiet_week = features(&[400.0, 420.0, 410.0, 430.0], 0.0);
    assert_relative_eq!(model.predict(&quiet_week).unwrap(), 900.0);

    let holiday_week = features(&[600.0, 620.0, 610.0, 630.0], 1.0);
    assert_relative_eq!(model.predict(&holiday_week).unwrap(), 1325.5);
}

#[test]
fn test_importances_are_sorted() {
    let model = parse_model(&ensemble_json().to_string()).unwrap();
    let importances = model.feature_importances().unwrap();

    assert_eq!(importances.len(), FEATURE_NAMES.len());
    assert_eq!(importances[0].feature, "rolling_4");
    assert_eq!(importances[1].feature, "Holiday_Flag");
    assert!(importances
        .windows(2)
        .all(|w| w[0].importance >= w[1].importance));
}

#[test]
fn test_schema_mismatch_is_rejected() {
    let mut value = ensemble_json();
    value["feature_names"] = json!([
        "lag_2", "lag_1", "lag_4", "rolling_4", "week_of_year", "month", "year",
        "Holiday_Flag", "Temperature", "Fuel_Price", "CPI", "Unemployment"
    ]);

    let err = parse_model(&value.to_string()).unwrap_err();
    assert!(matches!(err, ForecastError::ModelError(_)));
    assert!(err.to_string().contains("schema mismatch"));
}

#[test]
fn test_linear_model_has_no_importances() {
    let value = json!({
        "kind": "linear",
        "intercept": 12.0,
        "feature_names": FEATURE_NAMES,
        "coefficients": [0.9, 0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    });
    let model = parse_model(&value.to_string()).unwrap();

    assert!(model.feature_importances().is_none());
    let x = features(&[10.0, 20.0, 15.0, 25.0], 0.0);
    assert_relative_eq!(model.predict(&x).unwrap(), 12.0 + 0.9 * 25.0 + 0.1 * 17.5);
}

#[test]
fn test_model_load_errors() {
    assert!(matches!(
        load_model("/nonexistent/model.json"),
        Err(ForecastError::IoError(_))
    ));
    assert!(matches!(
        parse_model("not json"),
        Err(ForecastError::JsonError(_))
    ));
}

#[test]
fn test_tree_ensemble_constructor() {
    let trees = vec![vec![Node::Leaf { leaf: 3.0 }]];
    let model = TreeEnsemble::new(2.0, schema(), trees, None).unwrap();

    assert_eq!(model.n_trees(), 1);
    assert_eq!(model.base_score(), 2.0);
    assert_relative_eq!(
        model.predict(&features(&[1.0, 1.0, 1.0, 1.0], 0.0)).unwrap(),
        5.0
    );
}
