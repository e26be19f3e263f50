//! Error taxonomy for `gh`-backed operations and diagnostic formatting.

use std::error::Error as StdError;
use thiserror::Error;

/// Result type for every operation routed through the external agent.
pub type Result<T> = std::result::Result<T, GhError>;

/// Failures surfaced by target resolution, the agent boundary, and handlers.
#[derive(Debug, Error)]
pub enum GhError {
    /// Malformed or contradictory input, detected before any external call.
    #[error("{0}")]
    Validation(String),
    /// An ambient-context lookup (current repository or pull request) failed.
    #[error("{0}")]
    Resolution(#[source] Box<GhError>),
    #[error("failed to run `{program}`; ensure GitHub CLI is installed")]
    AgentUnavailable {
        program: String,
        source: std::io::Error,
    },
    /// The agent exited non-zero; `stderr` is its own diagnostic.
    #[error("{stderr}")]
    Transport { status: i32, stderr: String },
    #[error("graphql response error: {0}")]
    GraphQl(String),
    /// The agent succeeded but its output was not what the call expects.
    #[error("unexpected response from GitHub CLI: {0}")]
    Protocol(String),
    #[error("{0}")]
    NotFound(String),
}

impl GhError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wraps an ambient lookup failure, keeping its diagnostic as the message.
    pub fn resolution(cause: GhError) -> Self {
        Self::Resolution(Box::new(cause))
    }

    /// Returns true when the failure happened before any external call.
    #[cfg(test)]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Formats an error and its sources into a single diagnostic line.
///
/// Adjacent duplicate messages are collapsed, so a resolution failure prints
/// the agent's text once rather than once per wrapper.
pub fn format_error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut current = Some(error);
    let mut parts = Vec::new();

    while let Some(err) = current {
        let text = err.to_string();
        if !text.is_empty() && parts.last() != Some(&text) {
            parts.push(text);
        }
        current = err.source();
    }

    if parts.is_empty() {
        "unknown error".to_owned()
    } else {
        parts.join(": ")
    }
}
