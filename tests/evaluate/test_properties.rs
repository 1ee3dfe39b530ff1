//! Model and classifier properties over the clinical input ranges

use approx::assert_relative_eq;
use methadone_tdm::model::input_range;
use methadone_tdm::prelude::*;

fn grid(range: (f64, f64), steps: usize) -> Vec<f64> {
    (0..=steps)
        .map(|i| range.0 + (range.1 - range.0) * i as f64 / steps as f64)
        .collect()
}

#[test]
fn test_time_zero_single_dose_closed_form() {
    for dose in grid(input_range::DOSE_MG, 6) {
        for weight in grid(input_range::WEIGHT_KG, 6) {
            for half_life in grid(input_range::HALF_LIFE_H, 5) {
                let profile = DoseProfile::new(dose, weight, half_life).unwrap();
                let c = estimate(&profile, 0.0, DosingMode::SingleDose).unwrap();
                assert_relative_eq!(c, dose * 1000.0 / (4.0 * weight), max_relative = 1e-12);
            }
        }
    }
}

#[test]
fn test_steady_state_dominates_single_dose() {
    for half_life in grid(input_range::HALF_LIFE_H, 10) {
        let profile = DoseProfile::new(100.0, 80.0, half_life).unwrap();
        for t in grid(input_range::TIME_SINCE_DOSE_H, 12) {
            let single = estimate(&profile, t, DosingMode::SingleDose).unwrap();
            let steady = estimate(&profile, t, DosingMode::SteadyState).unwrap();
            assert!(steady >= single, "t½ = {}, t = {}", half_life, t);
        }
    }
}

#[test]
fn test_probabilistic_distribution_over_measured_range() {
    let profile = DoseProfile::new(60.0, 70.0, 24.0).unwrap();
    let expected = ConcentrationEstimate::compute(
        &profile,
        12.0,
        DosingMode::SteadyState,
        &ModelOptions::default(),
    )
    .unwrap();

    for strategy in [ProbabilisticStrategy::default(), ProbabilisticStrategy::strict()] {
        for methadone in grid(input_range::MEASURED_NG_ML, 20) {
            for eddp in grid(input_range::MEASURED_NG_ML, 20) {
                let sample = SampleObservation::new(12.0, methadone, eddp).unwrap();
                let result = strategy.classify(&sample, &expected);
                let p = result.probabilities.unwrap();
                assert!(p.slow >= 0.0 && p.normal >= 0.0 && p.fast >= 0.0);
                assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_every_strategy_is_total() {
    let options = EvaluationOptions::default().with_comparison(true);
    for t in grid(input_range::TIME_SINCE_DOSE_H, 8) {
        for methadone in grid(input_range::MEASURED_NG_ML, 10) {
            for eddp in grid(input_range::MEASURED_NG_ML, 10) {
                let request = EvaluationRequest::new(60.0, 70.0, 24.0, t, methadone, eddp);
                assert!(evaluate(&request, &options).is_ok());
            }
        }
    }
}

#[test]
fn test_capped_model_never_exceeds_ceiling() {
    let options = EvaluationOptions::default().with_model(ModelOptions::capped());
    let request = EvaluationRequest::new(300.0, 30.0, 60.0, 1.0, 500.0, 100.0);
    let result = evaluate(&request, &options).unwrap();

    assert_eq!(result.expected.methadone_ng_ml, 400.0);
    assert_relative_eq!(result.expected.eddp_ng_ml, 120.0, epsilon = 1e-9);
    // 500 is above the capped band [320, 480]
    assert_eq!(result.risk, RiskLevel::Overdose);
}

#[test]
fn test_curve_for_plotting() {
    let profile = DoseProfile::new(60.0, 70.0, 24.0).unwrap();
    let curve = concentration_curve(
        &profile,
        DosingMode::SteadyState,
        &ModelOptions::default(),
        48.0,
        100,
    )
    .unwrap();

    assert_eq!(curve.len(), 100);
    // two half-lives over 48 h
    assert_relative_eq!(
        curve[99].methadone_ng_ml,
        curve[0].methadone_ng_ml / 4.0,
        max_relative = 1e-9
    );
}
