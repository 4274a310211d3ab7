// ABOUTME: Domain error type — configuration, provider, parse, and session-store failures.
// ABOUTME: Every variant renders to a single line suitable for display in the UI or CLI.

use thiserror::Error;

/// Errors raised by meeting operations.
#[derive(Debug, Error)]
pub enum MeetingError {
    /// A role cannot be consulted: missing credential, missing binding, or
    /// an incomplete role definition. Raised before any provider call.
    #[error("role '{role}' is not configured: {reason}")]
    Configuration { role: String, reason: String },

    /// A hosted LLM call failed (transport, HTTP status, auth, quota, or an
    /// unexpected response body).
    #[error("{provider} request failed: {message}")]
    Provider { provider: String, message: String },

    /// A session file or document could not be parsed.
    #[error("could not parse {what}: {message}")]
    Parse { what: String, message: String },

    /// No saved meeting exists under the requested name.
    #[error("no saved meeting named '{0}'")]
    SessionNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MeetingError {
    pub fn configuration(role: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            role: role.into(),
            reason: reason.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn parse(what: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.to_string(),
        }
    }

    /// True for errors detected before a provider was contacted.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, MeetingError>;
