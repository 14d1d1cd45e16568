//! Visitor identity resolution shared by tracking nodes.

use std::sync::Arc;

use serde_json::Value;

use crate::context::{Context, User};
use crate::settings::Settings;

/// Maps an authenticated user to the identity sent to the analytics service.
pub type IdentityFn = Arc<dyn Fn(&User) -> String + Send + Sync>;

/// Identity of the current visitor, if any.
///
/// Lookup order is `<prefix>_identity`, then `analytical_identity`, then the
/// authenticated user (when auto-identification is enabled). The user's
/// username is used unless `identity_func` is given.
pub fn get_identity(
    context: &Context,
    settings: &Settings,
    prefix: Option<&str>,
    identity_func: Option<&IdentityFn>,
) -> Option<String> {
    if let Some(prefix) = prefix {
        if let Some(v) = context.get(&format!("{prefix}_identity")) {
            return identity_value(v);
        }
    }
    if let Some(v) = context.get("analytical_identity") {
        return identity_value(v);
    }
    if settings.effective_auto_identify() {
        let user = context.user()?;
        if user.is_authenticated {
            return Some(match identity_func {
                Some(f) => (**f)(user),
                None => user.username.clone(),
            });
        }
    }
    None
}

// An explicit null means "do not identify".
fn identity_value(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
