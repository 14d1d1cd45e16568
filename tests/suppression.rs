use kissmetrics_tag as km;
use km::context::{Context, Request};
use km::settings::Settings;

const KEY: &str = "0123456789abcdef0123456789abcdef01234567";

fn is_commented(out: &str) -> bool {
    out.starts_with("<!-- KISSmetrics disabled on internal IP address\n") && out.ends_with("\n-->")
}

#[test]
fn test_internal_ip_is_commented_out() {
    let settings = Settings {
        internal_ips: vec!["1.1.1.1".into()],
        ..Settings::default().with_api_key(KEY)
    };
    let ctx = Context::new().with_request(Request::default().with_meta("REMOTE_ADDR", "1.1.1.1"));
    let out = km::render(&settings, &ctx).unwrap();
    assert!(is_commented(&out));
    // still visible for debugging
    assert!(out.contains(KEY));

    let ctx = Context::new().with_request(Request::default().with_meta("REMOTE_ADDR", "9.9.9.9"));
    assert!(!is_commented(&km::render(&settings, &ctx).unwrap()));
}

#[test]
fn test_service_specific_internal_ips() {
    let settings = Settings {
        kiss_metrics_internal_ips: vec!["10.0.0.5".into()],
        internal_ips: vec!["1.1.1.1".into()],
        ..Settings::default().with_api_key(KEY)
    };
    let ctx = Context::new().with_request(Request::default().with_meta("REMOTE_ADDR", "1.1.1.1"));
    assert!(!is_commented(&km::render(&settings, &ctx).unwrap()));
    let ctx = Context::new().with_request(Request::default().with_meta("HTTP_X_FORWARDED_FOR", "10.0.0.5"));
    assert!(is_commented(&km::render(&settings, &ctx).unwrap()));
}

#[test]
fn test_disable_flags() {
    let disabled = Settings { metrics_disabled: Some(true), ..Settings::default().with_api_key(KEY) };
    assert!(is_commented(&km::render(&disabled, &Context::new()).unwrap()));

    let debug = Settings { debug: true, ..Settings::default().with_api_key(KEY) };
    assert!(is_commented(&km::render(&debug, &Context::new()).unwrap()));

    let forced_on = Settings { debug: true, metrics_disabled: Some(false), ..Settings::default().with_api_key(KEY) };
    assert!(!is_commented(&km::render(&forced_on, &Context::new()).unwrap()));
}

// Everything between the opening marker and the final `-->` must stay commented.
fn comment_body(out: &str) -> &str {
    let start = "<!-- KISSmetrics disabled on internal IP address\n".len();
    &out[start..out.len() - "\n-->".len()]
}

#[test]
fn test_context_data_cannot_close_comment() {
    let disabled = Settings { metrics_disabled: Some(true), ..Settings::default().with_api_key(KEY) };
    let ctx = Context::new()
        .set("kiss_metrics_identity", serde_json::json!("a-->b"))
        .set("kiss_metrics_event", serde_json::json!(["--!>", {"k": "--!>"}]))
        .set("kiss_metrics_properties", serde_json::json!({"x": "--><script>alert(1)//"}));
    let out = km::render(&disabled, &ctx).unwrap();
    assert!(is_commented(&out));
    let body = comment_body(&out);
    assert!(!body.contains("-->"), "comment closed early: {out}");
    assert!(!body.contains("--!>"), "comment closed early: {out}");
    assert!(!body.contains("<script>alert"));
}
