mod common;

use assert_approx_eq::assert_approx_eq;
use common::{month_rows, seasonal_revenue, InMemorySource};
use revenue_forecast::data::Period;
use revenue_forecast::prediction::{Method, PredictionService};

fn period(year: i32, month: u32) -> Period {
    Period::new(year, month).unwrap()
}

/// 36 months of trending seasonal revenue ending 2024-12
fn seasonal_source() -> InMemorySource {
    let start = period(2022, 1);
    InMemorySource::new().with_aggregates(month_rows(None, start, 36, move |t| {
        seasonal_revenue(10_000.0, 50.0, start, t)
    }))
}

#[test]
fn test_tes_outcome_carries_the_record_fields() {
    let source = seasonal_source();
    let service = PredictionService::new(&source);

    let outcome = service
        .predict_tes(None, period(2025, 1), 12, None, None, None, true)
        .unwrap();

    assert_eq!(outcome.method, Method::Tes);
    assert_eq!(outcome.method.tag(), "TES");
    assert_eq!(outcome.category, None);
    assert_eq!(outcome.training_from, period(2022, 1));
    assert_eq!(outcome.training_to, period(2024, 12));
    assert_eq!(outcome.training_len, 36);
    assert!(outcome.forecast > 0.0);
    assert!((0.0..=1.0).contains(&outcome.parameters.alpha));
    assert_eq!(outcome.parameters.seasonal_periods, Some(12));

    let metrics = outcome.metrics.expect("in-sample metrics present");
    assert!(metrics.mape >= 0.0);
    assert!(metrics.rmse >= metrics.mae);

    // No actual recorded for the target yet
    assert!(outcome.actual.is_none());
}

#[test]
fn test_back_test_against_a_recorded_actual() {
    let source = seasonal_source().with_actual(None, period(2025, 1), 14_000.0);
    let service = PredictionService::new(&source);

    let outcome = service
        .predict_ses(None, period(2025, 1), None, true)
        .unwrap();

    let comparison = outcome.actual.expect("actual comparison present");
    assert_eq!(comparison.actual, 14_000.0);
    assert_approx_eq!(
        comparison.error_abs,
        (outcome.forecast - 14_000.0).abs(),
        1e-9
    );
    assert_approx_eq!(
        comparison.accuracy,
        100.0 - comparison.error_pct,
        1e-9
    );
}

#[test]
fn test_point_estimate_uses_the_target_horizon() {
    // Perfect line ending 2023-11; target 2024-02 is three steps out
    let start = period(2023, 6);
    let source = InMemorySource::new().with_aggregates(month_rows(None, start, 6, |t| {
        10.0 + 10.0 * t as f64
    }));
    let service = PredictionService::new(&source);

    let outcome = service
        .predict_des(None, period(2024, 2), Some(1.0), Some(1.0), false)
        .unwrap();

    // level 60, trend 10, horizon 3
    assert_approx_eq!(outcome.forecast, 90.0, 1e-9);
}

#[test]
fn test_ses_forecast_ignores_the_horizon_length() {
    let source = seasonal_source();
    let service = PredictionService::new(&source);

    let near = service
        .predict_ses(None, period(2025, 1), Some(0.5), false)
        .unwrap();
    let far = service
        .predict_ses(None, period(2025, 6), Some(0.5), false)
        .unwrap();

    // Flat forecast function: the horizon does not change the value
    assert_approx_eq!(near.forecast, far.forecast, 1e-9);
}

#[test]
fn test_compare_methods_isolates_a_failing_method() {
    // Six months: enough for SES and DES, far too short for TES
    let start = period(2024, 1);
    let source = InMemorySource::new().with_aggregates(month_rows(None, start, 6, |t| {
        1000.0 + 25.0 * t as f64
    }));
    let service = PredictionService::new(&source);

    let comparison = service.compare_methods(None, period(2024, 8));

    assert!(comparison.ses.is_ok());
    assert!(comparison.des.is_ok());
    assert!(comparison.tes.is_err());

    let best = comparison.best_method.expect("a surviving method wins");
    assert!(best == Method::Ses || best == Method::Des);
    assert!(comparison.best_mape.unwrap() >= 0.0);
}

#[test]
fn test_compare_methods_with_no_data_recommends_nothing() {
    let source = InMemorySource::new();
    let service = PredictionService::new(&source);

    let comparison = service.compare_methods(None, period(2024, 8));

    assert!(comparison.ses.is_err());
    assert!(comparison.des.is_err());
    assert!(comparison.tes.is_err());
    assert_eq!(comparison.best_method, None);
    assert_eq!(comparison.best_mape, None);
}

#[test]
fn test_outcome_serializes_to_json() {
    let source = seasonal_source();
    let service = PredictionService::new(&source);

    let outcome = service
        .predict_des(None, period(2025, 1), None, None, true)
        .unwrap();
    let json = outcome.to_json().unwrap();
    assert!(json.contains("\"method\""));
    assert!(json.contains("\"forecast\""));
}
