use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A visitor as seen by the authentication layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl User {
    pub fn authenticated(username: impl Into<String>) -> Self {
        Self { username: username.into(), is_authenticated: true }
    }

    pub fn anonymous() -> Self {
        Self { username: String::new(), is_authenticated: false }
    }
}

/// Request metadata: CGI-style `META` entries and the request's user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub meta: HashMap<String, String>,
    pub user: Option<User>,
}

impl Request {
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }
}

/// Per-render template context.
/// Variables are plain JSON values; `user` and `request` are typed because
/// identity and internal-IP detection read them structurally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    #[serde(flatten)]
    pub vars: Map<String, Value>,
    pub user: Option<User>,
    pub request: Option<Request>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.vars.insert(key.into(), value);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    /// `context['user']`, falling back to `context['request'].user`.
    pub fn user(&self) -> Option<&User> {
        self.user
            .as_ref()
            .or_else(|| self.request.as_ref().and_then(|r| r.user.as_ref()))
    }
}
