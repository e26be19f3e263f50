//! `resolve` / `unresolve`: flip a review thread's resolution state.

use crate::github::client::Gateway;
use crate::github::errors::{GhError, Result};
use crate::github::threads::set_review_thread_resolved;

/// Resolves (`resolved = true`) or unresolves a thread by its GraphQL node id.
pub async fn run_set_resolved<G: Gateway>(
    gateway: &G,
    thread_id: &str,
    resolved: bool,
) -> Result<String> {
    let thread_id = thread_id.trim();
    if thread_id.is_empty() {
        return Err(GhError::validation("Thread id must not be empty."));
    }

    let resolution = set_review_thread_resolved(gateway, thread_id, resolved).await?;
    if resolution.is_resolved != resolved {
        tracing::warn!(
            thread = %resolution.id,
            is_resolved = resolution.is_resolved,
            "thread state differs from the requested state"
        );
    }

    let verb = if resolution.is_resolved {
        "Resolved"
    } else {
        "Unresolved"
    };
    Ok(format!("{verb} review thread {}.", resolution.id))
}
