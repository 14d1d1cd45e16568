//! Deciding when tracking output must be commented out instead of run.

use crate::context::Context;
use crate::settings::Settings;

const FORWARDED_FOR: &str = "HTTP_X_FORWARDED_FOR";
const REMOTE_ADDR: &str = "REMOTE_ADDR";

/// Whether the visitor's address is in the configured internal list.
///
/// The client address is the whole `X-Forwarded-For` value, or
/// `REMOTE_ADDR` when that header is missing or empty. A multi-hop header
/// only matches an entry spelled the same way.
pub fn is_internal_ip(context: &Context, settings: &Settings) -> bool {
    let Some(request) = context.request.as_ref() else {
        return false;
    };
    let remote_ip = [FORWARDED_FOR, REMOTE_ADDR]
        .into_iter()
        .filter_map(|key| request.meta.get(key))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or("");
    if remote_ip.is_empty() {
        return false;
    }
    settings
        .effective_internal_ips()
        .iter()
        .any(|ip| ip == remote_ip)
}

/// `METRICS_DISABLED`, or `DEBUG` when that is not set.
pub fn on_debug_mode(settings: &Settings) -> bool {
    settings.effective_metrics_disabled()
}

/// Comment `html` out, keeping it visible in the page source.
pub fn disable_html(html: &str, service: &str) -> String {
    format!("<!-- {service} disabled on internal IP address\n{html}\n-->")
}
