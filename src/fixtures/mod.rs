//! Deterministic fixture data and a recording stand-in for the `gh` boundary.

use crate::domain::{Author, CommentConnection, ReviewThread, ReviewThreadComment};
use crate::github::client::{AmbientContext, Gateway, RestRequest, Variable};
use crate::github::errors::{GhError, Result};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Builds a comment on `src/lib.rs` with the given anchors.
pub fn comment(id: &str, line: Option<u64>, original_line: Option<u64>) -> ReviewThreadComment {
    ReviewThreadComment {
        id: id.to_owned(),
        database_id: None,
        body: format!("comment {id}"),
        path: "src/lib.rs".to_owned(),
        line,
        original_line,
        author: Some(Author {
            login: "octocat".to_owned(),
        }),
        created_at: "2026-02-13T03:32:00Z".to_owned(),
        url: format!("https://github.com/octo/widgets/pull/7#discussion_{id}"),
    }
}

/// Builds a single-comment thread.
pub fn thread(id: &str, is_resolved: bool) -> ReviewThread {
    ReviewThread {
        id: id.to_owned(),
        is_resolved,
        comments: CommentConnection {
            nodes: vec![comment(&format!("{id}_C1"), Some(1), Some(1))],
        },
    }
}

/// A listing response shaped like `gh api graphql` output.
pub fn listing_payload(threads: &[(&str, bool)]) -> Value {
    let nodes: Vec<Value> = threads
        .iter()
        .enumerate()
        .map(|(index, (id, is_resolved))| {
            json!({
                "id": id,
                "isResolved": is_resolved,
                "comments": {
                    "nodes": [{
                        "id": format!("PRRC_{index}"),
                        "databaseId": 1000 + index,
                        "body": format!("Please rename this ({id})."),
                        "path": "consensus/src/marshal/store.rs",
                        "line": 18,
                        "originalLine": 17,
                        "author": {"login": "patrick-ogrady"},
                        "createdAt": "2026-02-13T03:32:00Z",
                        "url": format!("https://github.com/octo/widgets/pull/7#discussion_r{index}"),
                    }]
                }
            })
        })
        .collect();

    json!({
        "data": {
            "repository": {
                "pullRequest": {
                    "reviewThreads": {"nodes": nodes}
                }
            }
        }
    })
}

/// An external call observed by [`FakeGh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentRepository,
    CurrentPullRequest,
    GraphQl {
        document: String,
        variables: Vec<Variable>,
        host: Option<String>,
    },
    Rest(RestRequest),
}

/// Records every call and answers from queued responses.
///
/// Unqueued calls fail with a transport error so tests notice unexpected
/// traffic.
#[derive(Debug, Default)]
pub struct FakeGh {
    calls: RefCell<Vec<Call>>,
    repository: RefCell<VecDeque<Result<String>>>,
    pull_request: RefCell<VecDeque<Result<String>>>,
    responses: RefCell<VecDeque<Result<Value>>>,
}

impl FakeGh {
    pub fn with_repository(self, answer: Result<String>) -> Self {
        self.repository.borrow_mut().push_back(answer);
        self
    }

    pub fn with_pull_request(self, answer: Result<String>) -> Self {
        self.pull_request.borrow_mut().push_back(answer);
        self
    }

    /// Queues the next GraphQL or REST response.
    pub fn respond(self, answer: Result<Value>) -> Self {
        self.push_response(answer);
        self
    }

    pub fn push_response(&self, answer: Result<Value>) {
        self.responses.borrow_mut().push_back(answer);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next<T>(queue: &RefCell<VecDeque<Result<T>>>) -> Result<T> {
        queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unexpected_call()))
    }
}

impl Gateway for FakeGh {
    async fn graphql(
        &self,
        document: &str,
        variables: &[Variable],
        host: Option<&str>,
    ) -> Result<Value> {
        self.record(Call::GraphQl {
            document: document.to_owned(),
            variables: variables.to_vec(),
            host: host.map(str::to_owned),
        });
        Self::next(&self.responses)
    }

    async fn rest(&self, request: &RestRequest) -> Result<Value> {
        self.record(Call::Rest(request.clone()));
        Self::next(&self.responses)
    }
}

impl AmbientContext for FakeGh {
    async fn current_repository(&self) -> Result<String> {
        self.record(Call::CurrentRepository);
        Self::next(&self.repository)
    }

    async fn current_pull_request(&self) -> Result<String> {
        self.record(Call::CurrentPullRequest);
        Self::next(&self.pull_request)
    }
}

fn unexpected_call() -> GhError {
    GhError::Transport {
        status: 1,
        stderr: "unexpected call in test".to_owned(),
    }
}
