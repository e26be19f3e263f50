//! Human-readable and machine-readable renderers for review thread listings.

use crate::domain::{ReviewThread, ReviewThreadComment};
use crate::github::errors::{GhError, Result};
use serde::Serialize;

/// Printed in human mode when no thread survives filtering.
pub const EMPTY_LISTING: &str = "No review comments found.";

#[derive(Debug, Serialize)]
struct ListingEnvelope<'a> {
    data: ListingData<'a>,
}

#[derive(Debug, Serialize)]
struct ListingData<'a> {
    repository: ListingRepository<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingRepository<'a> {
    pull_request: ListingPullRequest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingPullRequest<'a> {
    review_threads: ListingThreads<'a>,
}

#[derive(Debug, Serialize)]
struct ListingThreads<'a> {
    nodes: &'a [ReviewThread],
}

/// Renders threads in the upstream `data.repository.pullRequest.reviewThreads.nodes` shape.
pub fn render_threads_json(threads: &[ReviewThread]) -> Result<String> {
    let envelope = ListingEnvelope {
        data: ListingData {
            repository: ListingRepository {
                pull_request: ListingPullRequest {
                    review_threads: ListingThreads { nodes: threads },
                },
            },
        },
    };

    serde_json::to_string_pretty(&envelope)
        .map_err(|error| GhError::protocol(format!("failed to serialize threads: {error}")))
}

/// Renders one paragraph per thread, in response order.
pub fn render_threads_text(threads: &[ReviewThread]) -> String {
    if threads.is_empty() {
        return EMPTY_LISTING.to_owned();
    }

    let mut out = Vec::new();
    for thread in threads {
        out.push(format!("[{}] {}", thread.id, thread.status()));
        for comment in thread.comments() {
            render_comment(&mut out, comment);
        }
        out.push(String::new());
    }

    out.join("\n")
}

fn render_comment(out: &mut Vec<String>, comment: &ReviewThreadComment) {
    out.push(format!(
        "  {} {} @{}  {}",
        comment.reference(),
        comment.location(),
        comment.author_login(),
        short_date(&comment.created_at)
    ));

    let body = comment.body.trim();
    if body.is_empty() {
        out.push("    (no body)".to_owned());
    } else {
        out.extend(body.lines().map(|line| format!("    {line}").trim_end().to_owned()));
    }

    out.push(format!("  {}", comment.url));
}

fn short_date(value: &str) -> String {
    if value.len() >= 16 && value.is_char_boundary(16) {
        return value[..16].replace('T', " ");
    }
    value.to_owned()
}
