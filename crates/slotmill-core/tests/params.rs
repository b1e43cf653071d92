use slotmill_core::{DomainError, ToolpathParameters, ToolpathParametersBuilder};

#[test]
fn test_partial_json_uses_sample_defaults() {
    let json = r#"{ "end_x": 25.0, "end_y": 0.0, "spindle_speed": 12000 }"#;
    let params: ToolpathParameters = serde_json::from_str(json).unwrap();

    assert_eq!(params.end().x, 25.0);
    assert_eq!(params.end().y, 0.0);
    assert_eq!(params.spindle_speed(), 12000.0);
    assert_eq!(params.slot_width(), 1.5);
    assert_eq!(params.cutter_diameter(), 0.75);
}

#[test]
fn test_invalid_json_parameters_rejected() {
    let json = r#"{ "stepover_width": 0.0 }"#;
    let result: Result<ToolpathParameters, _> = serde_json::from_str(json);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Invalid stepover width"));
}

#[test]
fn test_serialized_parameters_are_flat() {
    let params = ToolpathParameters::builder().build().unwrap();
    let value = serde_json::to_value(&params).unwrap();

    assert_eq!(value["start_x"], 0.0);
    assert_eq!(value["end_y"], 10.0);
    assert_eq!(value["plunge_feed"], 22.4);
}

#[test]
fn test_validation_reports_first_failure() {
    let builder = ToolpathParametersBuilder::default()
        .stepover_width(-0.5)
        .spindle_speed(0.0);

    assert_eq!(
        builder.validate(),
        Err(DomainError::InvalidStepover { value: -0.5 })
    );
}

#[test]
fn test_feed_rates_must_be_positive() {
    let err = ToolpathParameters::builder()
        .plunge_feed(0.0)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::InvalidFeedRate {
            name: "plunge feed",
            value: 0.0
        }
    );

    let err = ToolpathParameters::builder()
        .cut_feed(-10.0)
        .build()
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidFeedRate { name: "cut feed", .. }));
}

#[test]
fn test_spindle_speed_must_be_positive() {
    let err = ToolpathParameters::builder()
        .spindle_speed(-100.0)
        .build()
        .unwrap_err();
    assert_eq!(err, DomainError::InvalidSpindleSpeed { value: -100.0 });
}
