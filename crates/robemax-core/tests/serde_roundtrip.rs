use nalgebra::DVector;
use robemax_core::{EducationBounds, GaussianDistribution, StateCharacteristics, StateSpaceIndex};

#[test]
fn gaussian_round_trips_json() {
    let distribution =
        GaussianDistribution::from_row_slices(&[0.5, -1.0], &[2.0, 0.3, 0.3, 1.0]).expect("valid");
    let json = serde_json::to_string(&distribution).expect("serialize");
    let decoded: GaussianDistribution = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, distribution);
}

#[test]
fn gaussian_with_mismatched_mean_is_rejected() {
    let mut value = serde_json::to_value(GaussianDistribution::standard(3)).expect("serialize");
    value["mean"] = serde_json::to_value(DVector::<f64>::zeros(2)).expect("serialize mean");

    let err = serde_json::from_value::<GaussianDistribution>(value).unwrap_err();
    assert!(err.to_string().contains("gaussian_shape"));
}

#[test]
fn education_bounds_round_trip_and_reject_inverted_range() {
    let bounds = EducationBounds::new(10, 20).expect("valid");
    let json = serde_json::to_string(&bounds).expect("serialize");
    let decoded: EducationBounds = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, bounds);
    assert_eq!((decoded.edu_start(), decoded.edu_max()), (10, 20));

    let err = serde_json::from_str::<EducationBounds>(r#"{"edu_start":10,"edu_max":5}"#)
        .unwrap_err();
    assert!(err.to_string().contains("education_bounds"));
}

#[test]
fn state_index_round_trip_restores_lookups() {
    let mut index = StateSpaceIndex::new(2);
    let first = StateCharacteristics::new(0, 0, 0, false);
    let second = StateCharacteristics::new(1, 0, 1, true);
    index.insert(0, first).expect("insert");
    index.insert(1, first).expect("insert");
    index.insert(1, second).expect("insert");

    let json = serde_json::to_string(&index).expect("serialize");
    let decoded: StateSpaceIndex = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, index);
    assert_eq!(decoded.lookup(0, &first).expect("lookup"), 0);
    assert_eq!(decoded.lookup(1, &second).expect("lookup"), 1);
    assert!(decoded.lookup(0, &second).is_err());
}
