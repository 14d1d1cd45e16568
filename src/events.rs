use serde_json::Value;

use crate::errors::{AnalyticalError, Result};

/// A named occurrence and the properties recorded with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    /// Usually an object; any JSON value is passed through as given.
    pub properties: Value,
}

impl Event {
    pub fn new(name: impl Into<String>, properties: Value) -> Self {
        Self { name: name.into(), properties }
    }
}

/// Normalize an event context value into a list of events.
///
/// Two shapes are accepted: a single `["name", {..}]` pair, or a list of
/// such pairs. Properties may be any JSON value; anything else is rejected.
pub fn events_from_value(value: &Value) -> Result<Vec<Event>> {
    let items = value
        .as_array()
        .ok_or_else(|| AnalyticalError::InvalidContext(format!("event must be a list, got {value}")))?;
    match items.first() {
        None => Ok(Vec::new()),
        Some(Value::String(_)) => Ok(vec![pair(value)?]),
        Some(_) => items.iter().map(pair).collect(),
    }
}

fn pair(value: &Value) -> Result<Event> {
    match value.as_array().map(Vec::as_slice) {
        Some([Value::String(name), props]) => Ok(Event::new(name.clone(), props.clone())),
        _ => Err(AnalyticalError::InvalidContext(format!(
            "expected [name, properties], got {value}"
        ))),
    }
}
