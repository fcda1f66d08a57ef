
use robemax_core::{
    ChoiceValueEvaluator, ContinuationValueTable, RobustError, ShockDraw, StateContext,
};
use robemax_emax::{
    interpolate_period_emax, ols, EmaxEstimator, InterpolationConfig, KeaneWolpinEvaluator,
    ShockComposition,
};
use nalgebra::{DMatrix, DVector};

use fixtures::{bounds, standard_normal_draws, wide_period_model};

const NUM_STATES: u32 = 40;

fn period_context(table: &ContinuationValueTable) -> StateContext<'_> {
    StateContext {
        period: 0,
        state_index: 0,
        continuation_values: table,
        discount_factor: 0.95,
        education_bounds: bounds(),
    }
}

#[test]
fn covering_every_state_simulates_the_whole_period() {
    let (space, table, rewards) = wide_period_model(NUM_STATES);
    let evaluator = KeaneWolpinEvaluator::new(&space, ShockComposition::Additive);
    let draws = standard_normal_draws(200, 11);
    let estimator = EmaxEstimator::sequential();
    let context = period_context(&table);

    let report = interpolate_period_emax(
        &estimator,
        &evaluator,
        &rewards,
        &draws,
        &ShockDraw::default(),
        &context,
        &InterpolationConfig::with_points(NUM_STATES as usize),
    )
    .expect("interpolation");

    assert!(report.coefficients.is_none());
    assert!(report.simulated.iter().all(|&flag| flag));
    for (index, value) in report.emax.iter().enumerate() {
        let direct = estimator
            .estimate(&evaluator, &rewards[index], &draws, &context.with_state_index(index))
            .expect("direct")
            .emax;
        assert_eq!(*value, direct);
    }
}

#[test]
fn subset_is_simulated_and_the_rest_predicted_above_the_expected_maximum() {
    let (space, table, rewards) = wide_period_model(NUM_STATES);
    let evaluator = KeaneWolpinEvaluator::new(&space, ShockComposition::Additive);
    let draws = standard_normal_draws(200, 12);
    let estimator = EmaxEstimator::sequential();
    let context = period_context(&table);
    let config = InterpolationConfig { points: 12, seed: 7 };

    let report = interpolate_period_emax(
        &estimator,
        &evaluator,
        &rewards,
        &draws,
        &ShockDraw::default(),
        &context,
        &config,
    )
    .expect("interpolation");

    assert_eq!(report.emax.len(), NUM_STATES as usize);
    assert_eq!(report.simulated.iter().filter(|&&flag| flag).count(), 12);
    let coefficients = report.coefficients.as_ref().expect("coefficients");
    assert_eq!(coefficients.len(), 9);
    assert!(coefficients.iter().all(|value| value.is_finite()));

    for (index, value) in report.emax.iter().enumerate() {
        let state = context.with_state_index(index);
        if report.simulated[index] {
            let direct = estimator
                .estimate(&evaluator, &rewards[index], &draws, &state)
                .expect("direct")
                .emax;
            assert_eq!(*value, direct);
        } else {
            let at_mean = evaluator
                .total_values(&rewards[index], &ShockDraw::default(), &state)
                .expect("values");
            let max_expected = at_mean.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(*value >= max_expected);
            assert!(value.is_finite());
        }
    }
}

#[test]
fn same_seed_reproduces_the_same_period() {
    let (space, table, rewards) = wide_period_model(NUM_STATES);
    let evaluator = KeaneWolpinEvaluator::new(&space, ShockComposition::Additive);
    let draws = standard_normal_draws(100, 13);
    let context = period_context(&table);
    let run = |seed: u64| {
        interpolate_period_emax(
            &EmaxEstimator::sequential(),
            &evaluator,
            &rewards,
            &draws,
            &ShockDraw::default(),
            &context,
            &InterpolationConfig { points: 10, seed },
        )
        .expect("interpolation")
    };

    let first = run(21);
    assert_eq!(first, run(21));
    assert_ne!(first.simulated, run(22).simulated);
}

#[test]
fn fewer_than_two_points_is_invalid() {
    let (space, table, rewards) = wide_period_model(4);
    let evaluator = KeaneWolpinEvaluator::new(&space, ShockComposition::Additive);
    let err = interpolate_period_emax(
        &EmaxEstimator::sequential(),
        &evaluator,
        &rewards,
        &standard_normal_draws(10, 1),
        &ShockDraw::default(),
        &period_context(&table),
        &InterpolationConfig::with_points(1),
    )
    .unwrap_err();
    assert!(matches!(err, RobustError::InvalidInput(_)));
}

#[test]
fn ols_recovers_exact_linear_relation() {
    let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0]);
    let y = DVector::from_vec(vec![3.0, 5.0, 7.0, 9.0]);
    let beta = ols(&y, &x).expect("ols");
    assert!((beta[0] - 2.0).abs() < 1e-9);
    assert!((beta[1] - 1.0).abs() < 1e-9);

    let short = DVector::from_vec(vec![1.0]);
    assert!(matches!(ols(&short, &x), Err(RobustError::InvalidInput(_))));
}
