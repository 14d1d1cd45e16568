use thiserror::Error;

// Errors raised while configuring or rendering a tracking node
#[derive(Debug, Error)]
pub enum AnalyticalError {
    // A required setting is missing or does not match its expected format
    #[error("{setting} setting: {message}")]
    Setting { setting: &'static str, message: String },

    // A template tag was used with the wrong syntax
    #[error("template syntax error: {0}")]
    TemplateSyntax(String),

    // A context value has a shape the renderer cannot use
    #[error("invalid context: {0}")]
    InvalidContext(String),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyticalError {
    pub(crate) fn setting(setting: &'static str, message: impl Into<String>) -> Self {
        AnalyticalError::Setting { setting, message: message.into() }
    }

    /// True for a missing or malformed setting and for an unreadable settings
    /// document. Tag syntax, context shape and I/O failures are not counted.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalyticalError::Setting { .. } | AnalyticalError::Settings(_))
    }
}

// Type alias for results that use `AnalyticalError` as the error type
pub type Result<T> = std::result::Result<T, AnalyticalError>;
