use robemax_core::errors::{ErrorInfo, RobustError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("rows", 3)
        .with_context("cols", 2)
}

#[test]
fn numerical_error_surface() {
    let err = RobustError::Numerical(sample_info("N001", "singular covariance"));
    assert_eq!(err.info().code, "N001");
    assert_eq!(err.info().context.get("rows").map(String::as_str), Some("3"));
}

#[test]
fn invalid_input_error_surface() {
    let err = RobustError::invalid_input("I001", "empty draw set");
    assert_eq!(err.info().code, "I001");
    assert!(err.info().context.is_empty());
}

#[test]
fn lookup_error_surface() {
    let err = RobustError::Lookup(sample_info("L001", "missing emax").with_hint("solve later periods"));
    assert_eq!(err.info().hint.as_deref(), Some("solve later periods"));
}

#[test]
fn display_lists_context_and_hint() {
    let err = RobustError::Numerical(sample_info("N002", "non-positive determinant").with_hint("check covariance"));
    let rendered = err.to_string();
    assert_eq!(
        rendered,
        "numerical error: non-positive determinant (code: N002) | context: [cols=2, rows=3] | hint: check covariance"
    );
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = RobustError::Serde(ErrorInfo::new("S001", "schema mismatch"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Serde");
    assert_eq!(json["detail"]["code"], "S001");
    let back: RobustError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, err);
}
