//! KISSmetrics tracking node.

use std::fmt;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::Context;
use crate::errors::Result;
use crate::events::{events_from_value, Event};
use crate::identity::{get_identity, IdentityFn};
use crate::settings::{get_required_setting, Settings};
use crate::suppress::{disable_html, is_internal_ip, on_debug_mode};
use crate::tags::Node;

pub const API_KEY_SETTING: &str = "KISS_METRICS_API_KEY";
pub const EVENT_CONTEXT_KEY: &str = "kiss_metrics_event";
pub const PROPERTY_CONTEXT_KEY: &str = "kiss_metrics_properties";
pub const IDENTITY_PREFIX: &str = "kiss_metrics";
pub const SERVICE_NAME: &str = "KISSmetrics";

static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("valid api key pattern"));

const TRACKING_CODE: &str = r#"
    <script type="text/javascript">
      var _kmq = _kmq || [];
      {commands}
      function _kms(u){
        setTimeout(function(){
          var s = document.createElement('script');
          s.type = 'text/javascript';
          s.async = true;
          s.src = u;
          var f = document.getElementsByTagName('script')[0];
          f.parentNode.insertBefore(s, f);
        }, 1);
      }
      _kms('//i.kissmetrics.com/i.js');
      _kms('//doug1izaerwt3.cloudfront.net/{api_key}.1.js');
    </script>
"#;

/// One `_kmq` queue entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Identify(String),
    Record(Event),
    Set(Value),
}

impl Command {
    pub fn to_js(&self) -> String {
        match self {
            Command::Identify(id) => format!("_kmq.push(['identify', '{}']);", escape_js(id)),
            Command::Record(event) => format!(
                "_kmq.push(['record', '{}', {}]);",
                escape_js(&event.name),
                json_literal(&event.properties)
            ),
            Command::Set(props) => format!("_kmq.push(['set', {}]);", json_literal(props)),
        }
    }
}

/// Assemble the snippet from already-resolved inputs.
///
/// Commands are emitted as identify, each event in order, then global
/// properties.
pub fn render_tracking_code(
    api_key: &str,
    identity: Option<&str>,
    events: &[Event],
    properties: Option<&Value>,
) -> String {
    let commands = identity
        .map(|id| Command::Identify(id.to_string()))
        .into_iter()
        .chain(events.iter().cloned().map(Command::Record))
        .chain(properties.cloned().map(Command::Set))
        .map(|c| c.to_js())
        .join(" ");
    TRACKING_CODE
        .replace("{api_key}", api_key)
        .replace("{commands}", &commands)
}

/// Renders the KISSmetrics tracking code for one page.
///
/// Construction validates `KISS_METRICS_API_KEY`; rendering reads identity,
/// events and properties from the context.
#[derive(Clone)]
pub struct KissMetricsNode {
    api_key: String,
    settings: Settings,
    identity_func: Option<IdentityFn>,
}

impl KissMetricsNode {
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = get_required_setting(
            API_KEY_SETTING,
            settings.kiss_metrics_api_key.as_deref(),
            &API_KEY_RE,
            "must be a string containing a 40-digit hexadecimal number",
        )
        .inspect_err(|e| warn!(error = %e, "kissmetrics misconfigured"))?;
        Ok(Self { api_key, settings: settings.clone(), identity_func: None })
    }

    pub fn with_identity_func(mut self, f: IdentityFn) -> Self {
        self.identity_func = Some(f);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn render(&self, context: &Context) -> Result<String> {
        let identity = get_identity(
            context,
            &self.settings,
            Some(IDENTITY_PREFIX),
            self.identity_func.as_ref(),
        );
        let events = match context.get(EVENT_CONTEXT_KEY) {
            Some(v) => events_from_value(v)?,
            None => Vec::new(),
        };
        let properties = context.get(PROPERTY_CONTEXT_KEY);

        let html = render_tracking_code(&self.api_key, identity.as_deref(), &events, properties);
        let suppressed = is_internal_ip(context, &self.settings) || on_debug_mode(&self.settings);
        debug!(
            identified = identity.is_some(),
            events = events.len(),
            suppressed,
            "rendered kissmetrics snippet"
        );
        Ok(if suppressed { disable_html(&html, SERVICE_NAME) } else { html })
    }
}

impl fmt::Debug for KissMetricsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KissMetricsNode")
            .field("api_key", &self.api_key)
            .field("identity_func", &self.identity_func.is_some())
            .finish_non_exhaustive()
    }
}

impl Node for KissMetricsNode {
    fn render(&self, context: &Context) -> Result<String> {
        KissMetricsNode::render(self, context)
    }
}

// Single-quoted JS string body with no markup characters, so it can sit
// inside both a script element and an HTML comment.
fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3c"),
            '>' => out.push_str("\\x3e"),
            '&' => out.push_str("\\x26"),
            c => out.push(c),
        }
    }
    out
}

// `<`, `>` and `&` only occur inside JSON strings, where `\uXXXX` is valid.
fn json_literal(v: &Value) -> String {
    v.to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
