//! Tests for JSON requests and results

use approx::assert_relative_eq;
use methadone_tdm::prelude::*;

#[test]
fn test_request_defaults_when_selectors_omitted() {
    let json = r#"{
        "dose_mg": 60.0,
        "weight_kg": 70.0,
        "half_life_h": 24.0,
        "time_since_dose_h": 12.0,
        "methadone_measured_ng_ml": 350.0,
        "eddp_measured_ng_ml": 120.0
    }"#;

    let request = EvaluationRequest::from_json(json).unwrap();
    assert_eq!(request.mode, DosingMode::SteadyState);
    assert_eq!(request.risk_policy, RiskPolicy::Relative);
    assert_eq!(request.metabolism_strategy, StrategyKind::Ratio);
}

#[test]
fn test_request_with_selectors() {
    let json = r#"{
        "dose_mg": 60.0,
        "weight_kg": 70.0,
        "half_life_h": 24.0,
        "time_since_dose_h": 22.0,
        "methadone_measured_ng_ml": 700.0,
        "eddp_measured_ng_ml": 20.0,
        "mode": "single_dose",
        "risk_policy": "fixed",
        "metabolism_strategy": "profile"
    }"#;

    let request = EvaluationRequest::from_json(json).unwrap();
    let result = evaluate(&request, &EvaluationOptions::default()).unwrap();

    assert_eq!(result.metabolism.phenotype, Phenotype::Slow);
    assert_eq!(result.risk, RiskLevel::Overdose);
}

#[test]
fn test_malformed_request_is_json_error() {
    let result = EvaluationRequest::from_json(r#"{"dose_mg": "sixty"}"#);
    assert!(matches!(result, Err(MethadoneError::Json(_))));
}

#[test]
fn test_result_serializes_labels_in_snake_case() {
    let request = EvaluationRequest::new(60.0, 70.0, 24.0, 12.0, 350.0, 0.0)
        .with_metabolism_strategy(StrategyKind::Probabilistic);
    let result = evaluate(&request, &EvaluationOptions::default()).unwrap();
    let json = result.to_json().unwrap();

    assert!(json.contains("\"strategy\": \"probabilistic\""));
    assert!(json.contains("\"phenotype\": \"slow\""));
    assert!(json.contains("\"risk\": \"therapeutic\""));

    let parsed: Evaluation = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.metabolism.phenotype, Phenotype::Slow);
}

#[test]
fn test_options_from_partial_json() {
    let options: EvaluationOptions = serde_json::from_str(
        r#"{ "model": { "steady_state_ceiling": 400.0 }, "compare_strategies": true }"#,
    )
    .unwrap();

    assert_eq!(options.model.steady_state_ceiling, Some(400.0));
    assert_eq!(options.model.volume_of_distribution_l_per_kg, 4.0);
    assert!(options.compare_strategies);
}

#[test]
fn test_results_round_trip_at_range_extremes() {
    let options = EvaluationOptions::default().with_comparison(true);
    for &half_life in &[10.0, 60.0, 1e6] {
        for &dose in &[1.0, 300.0] {
            let request = EvaluationRequest::new(dose, 30.0, half_life, 1.0, 2000.0, 0.0);
            let result = evaluate(&request, &options).unwrap();
            assert!(result.expected.methadone_ng_ml.is_finite());

            let parsed: Evaluation = serde_json::from_str(&result.to_json().unwrap()).unwrap();
            assert_relative_eq!(
                parsed.expected.methadone_ng_ml,
                result.expected.methadone_ng_ml,
                max_relative = 1e-12
            );
            assert_eq!(parsed.comparison.map(|c| c.profile), result.comparison.map(|c| c.profile));
            assert_eq!(parsed.risk, result.risk);
        }
    }

    let unbounded = EvaluationRequest::new(60.0, 70.0, 1e20, 12.0, 230.0, 90.0);
    assert!(evaluate(&unbounded, &options).is_err());
}

#[test]
fn test_inverted_trough_window_from_json_rejected() {
    let options: EvaluationOptions = serde_json::from_str(
        r#"{ "classifier": { "profile": { "trough_window_h": [24.0, 20.0] } } }"#,
    )
    .unwrap();

    let request = EvaluationRequest::new(60.0, 70.0, 24.0, 22.0, 700.0, 20.0)
        .with_metabolism_strategy(StrategyKind::Profile);
    assert!(matches!(
        evaluate(&request, &options),
        Err(MethadoneError::InvalidParameter { ref param, .. })
            if param == "profile.trough_window_h.0"
    ));
}
