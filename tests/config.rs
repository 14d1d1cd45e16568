use kissmetrics_tag as km;
use km::settings::Settings;
use proptest::prelude::*;

// Missing and malformed keys are configuration errors raised at construction,
// before any context is seen.
#[test]
fn test_missing_api_key() {
    let err = km::KissMetricsNode::new(&Settings::default()).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.to_string(), "KISS_METRICS_API_KEY setting: not found");
}

#[test]
fn test_wrong_shape_api_key() {
    for key in [
        "0123456789abcdef0123456789abcdef0123456",   // 39 chars
        "0123456789abcdef0123456789abcdef012345678", // 41 chars
        "0123456789abcdef0123456789abcdef0123456g",  // non-hex
        "0123456789ABCDEF0123456789ABCDEF01234567",  // uppercase
    ] {
        let err = km::KissMetricsNode::new(&Settings::default().with_api_key(key)).unwrap_err();
        assert!(
            err.to_string().contains("must be a string containing a 40-digit hexadecimal number"),
            "unexpected error for {key}: {err}"
        );
    }
}

#[test]
fn test_settings_document() {
    let settings = Settings::from_json_str(
        r#"{"KISS_METRICS_API_KEY": "0123456789abcdef0123456789abcdef01234567", "METRICS_DISABLED": false}"#,
    )
    .unwrap();
    let node = km::KissMetricsNode::new(&settings).unwrap();
    assert_eq!(node.api_key(), "0123456789abcdef0123456789abcdef01234567");
    assert!(Settings::from_json_str("{not json").is_err());
}

proptest! {
    #[test]
    fn valid_keys_render_verbatim(key in "[0-9a-f]{40}") {
        let node = km::KissMetricsNode::new(&Settings::default().with_api_key(key.clone())).unwrap();
        prop_assert_eq!(node.api_key(), key.as_str());
        let out = node.render(&Default::default()).unwrap();
        prop_assert!(out.contains(&key));
    }

    #[test]
    fn wrong_length_keys_fail(key in "[0-9a-f]{0,39}|[0-9a-f]{41,60}") {
        prop_assert!(km::KissMetricsNode::new(&Settings::default().with_api_key(key)).is_err());
    }
}
