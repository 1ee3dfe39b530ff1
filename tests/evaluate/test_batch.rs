//! Tests for parallel batch evaluation

use methadone_tdm::prelude::*;

#[test]
fn test_batch_preserves_order_and_matches_single() {
    let options = EvaluationOptions::default();
    let requests: Vec<EvaluationRequest> = (1..=48)
        .map(|t| EvaluationRequest::new(60.0, 70.0, 24.0, t as f64, 350.0, 120.0))
        .collect();

    let results = evaluate_batch(&requests, &options);
    assert_eq!(results.len(), requests.len());

    for (request, result) in requests.iter().zip(results.iter()) {
        let batch = result.as_ref().unwrap();
        let single = evaluate(request, &options).unwrap();
        assert_eq!(batch, &single);
        assert_eq!(batch.expected.time_since_dose_h, request.time_since_dose_h);
    }
}

#[test]
fn test_batch_reports_failures_per_request() {
    let options = EvaluationOptions::default();
    let requests = vec![
        EvaluationRequest::new(60.0, 70.0, 24.0, 12.0, 350.0, 120.0),
        EvaluationRequest::new(60.0, 70.0, -24.0, 12.0, 350.0, 120.0),
        EvaluationRequest::new(60.0, 70.0, 24.0, 12.0, 350.0, 120.0),
    ];

    let results = evaluate_batch(&requests, &options);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(MethadoneError::InvalidParameter { ref param, .. }) if param == "half_life_h"
    ));
    assert!(results[2].is_ok());
}
