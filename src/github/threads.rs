//! Review thread queries, mutations, and the review-comment reply flow.

use crate::domain::{ReviewThread, ReviewThreads};
use crate::github::client::{Gateway, Method, RestRequest, Variable};
use crate::github::errors::{GhError, Result};
use crate::github::target::{RepositoryRef, Target};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct GraphQlReviewThreads {
    nodes: Vec<ReviewThread>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    review_threads: GraphQlReviewThreads,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRepository {
    pull_request: Option<GraphQlPullRequest>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    repository: Option<GraphQlRepository>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlThreadState {
    id: String,
    is_resolved: bool,
}

#[derive(Debug, Deserialize)]
struct GraphQlThreadPayload {
    thread: Option<GraphQlThreadState>,
}

#[derive(Debug, Deserialize)]
struct GhReviewComment {
    pull_request_url: String,
}

#[derive(Debug, Deserialize)]
struct GhReply {
    html_url: String,
}

const REVIEW_THREADS_QUERY: &str = r#"
query PullRequestReviewThreads($owner: String!, $repo: String!, $pullNumber: Int!) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $pullNumber) {
      reviewThreads(first: 100) {
        nodes {
          id
          isResolved
          comments(first: 100) {
            nodes {
              id
              databaseId
              body
              path
              line
              originalLine
              author { login }
              createdAt
              url
            }
          }
        }
      }
    }
  }
}
"#;

const RESOLVE_THREAD_MUTATION: &str = r#"
mutation ResolveReviewThread($threadId: ID!) {
  resolveReviewThread(input: {threadId: $threadId}) {
    thread { id isResolved }
  }
}
"#;

const UNRESOLVE_THREAD_MUTATION: &str = r#"
mutation UnresolveReviewThread($threadId: ID!) {
  unresolveReviewThread(input: {threadId: $threadId}) {
    thread { id isResolved }
  }
}
"#;

/// The identity and state a resolve/unresolve mutation reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadResolution {
    pub id: String,
    pub is_resolved: bool,
}

/// A reply created on a review comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedReply {
    pub html_url: String,
}

/// Fetches up to 100 review threads (100 comments each) for a pull request.
pub async fn fetch_review_threads<G: Gateway>(gateway: &G, target: &Target) -> Result<ReviewThreads> {
    let repository = &target.repository;
    let response = gateway
        .graphql(
            REVIEW_THREADS_QUERY,
            &[
                Variable::string("owner", &repository.owner),
                Variable::string("repo", &repository.repo),
                Variable::int("pullNumber", target.pull_request),
            ],
            repository.host.as_deref(),
        )
        .await?;

    normalize(response)
}

/// Navigates `data.repository.pullRequest.reviewThreads.nodes`.
///
/// A null repository or pull request is [`ReviewThreads::PullRequestNotFound`],
/// never an empty list.
pub fn normalize(raw: Value) -> Result<ReviewThreads> {
    let response: GraphQlResponse = serde_json::from_value(raw)
        .map_err(|error| GhError::protocol(format!("malformed review thread response: {error}")))?;

    let Some(data) = response.data else {
        return Err(GhError::protocol("missing review thread data in GraphQL response"));
    };

    let Some(pull_request) = data
        .repository
        .and_then(|repository| repository.pull_request)
    else {
        return Ok(ReviewThreads::PullRequestNotFound);
    };

    Ok(ReviewThreads::Found(pull_request.review_threads.nodes))
}

/// Resolves or unresolves a review thread by its GraphQL node id.
pub async fn set_review_thread_resolved<G: Gateway>(
    gateway: &G,
    thread_id: &str,
    resolved: bool,
) -> Result<ThreadResolution> {
    let (document, field) = if resolved {
        (RESOLVE_THREAD_MUTATION, "resolveReviewThread")
    } else {
        (UNRESOLVE_THREAD_MUTATION, "unresolveReviewThread")
    };

    let response = gateway
        .graphql(document, &[Variable::string("threadId", thread_id)], None)
        .await?;

    let payload = response
        .get("data")
        .ok_or_else(|| GhError::protocol("missing data in GraphQL mutation response"))?
        .get(field)
        .cloned()
        .unwrap_or(Value::Null);

    let payload: Option<GraphQlThreadPayload> = serde_json::from_value(payload)
        .map_err(|error| GhError::protocol(format!("malformed {field} response: {error}")))?;

    let Some(thread) = payload.and_then(|payload| payload.thread) else {
        return Err(GhError::not_found(format!(
            "Review thread {thread_id} not found."
        )));
    };

    Ok(ThreadResolution {
        id: thread.id,
        is_resolved: thread.is_resolved,
    })
}

/// Replies to a review comment by its numeric database id.
///
/// The owning pull request is looked up first; if that fails nothing is posted.
pub async fn reply_to_review_comment<G: Gateway>(
    gateway: &G,
    repository: &RepositoryRef,
    comment_id: u64,
    body: &str,
) -> Result<CreatedReply> {
    let owner = &repository.owner;
    let repo = &repository.repo;

    let comment = gateway
        .rest(&RestRequest {
            method: Method::Get,
            route: format!("repos/{owner}/{repo}/pulls/comments/{comment_id}"),
            fields: Vec::new(),
            host: repository.host.clone(),
        })
        .await?;
    let comment: GhReviewComment = serde_json::from_value(comment)
        .map_err(|error| GhError::protocol(format!("malformed review comment response: {error}")))?;
    let pull_number = pull_number_from_url(&comment.pull_request_url)?;

    let reply = gateway
        .rest(&RestRequest {
            method: Method::Post,
            route: format!("repos/{owner}/{repo}/pulls/{pull_number}/comments/{comment_id}/replies"),
            fields: vec![Variable::string("body", body)],
            host: repository.host.clone(),
        })
        .await?;
    let reply: GhReply = serde_json::from_value(reply)
        .map_err(|error| GhError::protocol(format!("malformed reply response: {error}")))?;

    Ok(CreatedReply {
        html_url: reply.html_url,
    })
}

fn pull_number_from_url(url: &str) -> Result<u64> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<u64>().ok())
        .ok_or_else(|| GhError::protocol(format!("cannot read pull request number from {url}")))
}
