use assert_approx_eq::assert_approx_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use revenue_forecast::error::ForecastError;
use revenue_forecast::models::double::DoubleExponentialSmoothing;
use revenue_forecast::models::simple::SimpleExponentialSmoothing;
use revenue_forecast::models::triple::TripleExponentialSmoothing;
use rstest::rstest;

#[test]
fn test_ses_forecast_is_flat() {
    let data = vec![100.0, 102.0, 104.0, 103.0, 105.0];
    let result = SimpleExponentialSmoothing::predict(&data, None, true, 3).unwrap();

    assert_eq!(result.future_forecasts.len(), 3);
    assert_eq!(result.future_forecasts[0], result.future_forecasts[1]);
    assert_eq!(result.future_forecasts[1], result.future_forecasts[2]);
    assert_eq!(result.forecast, result.future_forecasts[2]);
}

#[test]
fn test_ses_explicit_alpha_is_used_as_is() {
    let data = vec![10.0, 12.0, 13.0, 11.0, 14.0];
    let result = SimpleExponentialSmoothing::predict(&data, Some(0.7), false, 1).unwrap();
    assert_eq!(result.parameters.alpha, 0.7);

    // F(0)=10, F(1)=10, F(2)=0.7*12+0.3*10=11.4, ...
    assert_approx_eq!(result.fitted_values[2], 11.4, 1e-9);
}

#[test]
fn test_ses_rejects_out_of_bounds_alpha() {
    let data = vec![10.0, 12.0, 13.0];
    let result = SimpleExponentialSmoothing::predict(&data, Some(1.5), false, 1);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_des_reproduces_a_perfect_linear_trend() {
    let data = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
    let result =
        DoubleExponentialSmoothing::predict(&data, Some(1.0), Some(1.0), false, 2).unwrap();

    // With alpha = beta = 1 the state degenerates to the raw differences and
    // the one-step fitted values reproduce the series exactly
    for (t, &y) in data.iter().enumerate().skip(1) {
        assert_approx_eq!(result.fitted_values[t], y, 1e-9);
    }
    assert_approx_eq!(result.future_forecasts[0], 70.0, 1e-9);
    assert_approx_eq!(result.future_forecasts[1], 80.0, 1e-9);
}

#[test]
fn test_des_optimizer_finds_the_trend() {
    let data: Vec<f64> = (0..12).map(|t| 100.0 + 5.0 * t as f64).collect();
    let result = DoubleExponentialSmoothing::predict(&data, None, None, true, 1).unwrap();
    // Next point on the line is 160
    assert!((result.forecast - 160.0).abs() < 2.0);
}

#[rstest]
#[case::ses_needs_two(&[1.0][..], 2)]
#[case::des_needs_three(&[1.0, 2.0][..], 3)]
fn test_short_series_are_rejected(#[case] data: &[f64], #[case] required: usize) {
    let result = match required {
        2 => SimpleExponentialSmoothing::predict(data, None, true, 1),
        _ => DoubleExponentialSmoothing::predict(data, None, None, true, 1),
    };
    match result {
        Err(ForecastError::InsufficientData {
            required: r,
            available,
        }) => {
            assert_eq!(r, required);
            assert_eq!(available, data.len());
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_tes_requires_two_full_cycles() {
    let data = vec![1.0; 23];
    let result =
        TripleExponentialSmoothing::predict(&data, 12, None, None, None, true, 1);
    match result {
        Err(ForecastError::InsufficientData {
            required,
            available,
        }) => {
            assert_eq!(required, 24);
            assert_eq!(available, 23);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_zero_horizon_is_rejected() {
    let data = vec![10.0, 12.0, 13.0];
    let result = SimpleExponentialSmoothing::predict(&data, None, true, 0);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_tes_tracks_a_known_seasonal_pattern() {
    let season = [
        1.20, 0.80, 1.00, 1.10, 0.90, 1.05, 0.95, 1.15, 0.85, 1.00, 1.10, 0.90,
    ];
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.01).unwrap();

    let data: Vec<f64> = (0..24)
        .map(|t| {
            let level = 1000.0 + 10.0 * t as f64;
            level * season[t % 12] * (1.0 + noise.sample(&mut rng))
        })
        .collect();

    let result =
        TripleExponentialSmoothing::predict(&data, 12, None, None, None, true, 1).unwrap();

    // Month 25 of the underlying process, sanity bound rather than equality
    let expected = (1000.0 + 10.0 * 24.0) * season[0];
    let relative_error = (result.forecast - expected).abs() / expected;
    assert!(
        relative_error < 0.15,
        "forecast {:.1} deviates {:.1}% from {:.1}",
        result.forecast,
        relative_error * 100.0,
        expected
    );
}

#[test]
fn test_tes_forecasts_are_never_negative() {
    // Steep decline: linear extrapolation alone would go below zero
    let data: Vec<f64> = (0..24).map(|t| 2400.0 - 100.0 * t as f64).collect();
    let result =
        TripleExponentialSmoothing::predict(&data, 12, None, None, None, true, 6).unwrap();

    for &value in &result.future_forecasts {
        assert!(value >= 0.0, "negative forecast {}", value);
    }
}

#[test]
fn test_tes_fitted_values_cover_the_series() {
    let data: Vec<f64> = (0..24)
        .map(|t| 500.0 + 5.0 * t as f64 + if t % 12 == 0 { 50.0 } else { 0.0 })
        .collect();
    let result =
        TripleExponentialSmoothing::predict(&data, 12, None, None, None, true, 1).unwrap();

    assert_eq!(result.fitted_values.len(), data.len());
    assert_eq!(result.parameters.seasonal_periods, Some(12));
    let alpha = result.parameters.alpha;
    assert!((0.0..=1.0).contains(&alpha));
}

#[test]
fn test_smoothing_result_serializes() {
    let data = vec![10.0, 12.0, 13.0, 11.0];
    let result = SimpleExponentialSmoothing::predict(&data, None, true, 2).unwrap();
    let json = result.to_json().unwrap();
    assert!(json.contains("\"alpha\""));
}
