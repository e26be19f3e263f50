//! `reply`: answer a review comment.

use crate::github::client::{AmbientContext, Gateway};
use crate::github::errors::{GhError, Result};
use crate::github::target::resolve_repository;
use crate::github::threads::reply_to_review_comment;

/// Inputs of the `reply` command.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    /// Numeric database id of the comment being answered.
    pub comment_id: u64,
    pub body: String,
    pub repo: Option<String>,
}

/// Posts the reply and returns the URL of the created comment.
pub async fn run_reply<G, A>(gateway: &G, ambient: &A, request: &ReplyRequest) -> Result<String>
where
    G: Gateway,
    A: AmbientContext,
{
    if request.body.trim().is_empty() {
        return Err(GhError::validation("Reply body must not be empty."));
    }

    let repository = resolve_repository(ambient, request.repo.as_deref()).await?;
    let reply =
        reply_to_review_comment(gateway, &repository, request.comment_id, &request.body).await?;

    Ok(reply.html_url)
}
