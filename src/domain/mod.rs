//! Review thread models shared by the GitHub layer, handlers, and renderers.
//!
//! Field names follow the GraphQL wire shape so machine output can be
//! serialized straight back into the upstream layout.

use crate::github::errors::{GhError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A review-comment conversation anchored to a location in a pull request diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewThread {
    pub id: String,
    pub is_resolved: bool,
    pub comments: CommentConnection,
}

impl ReviewThread {
    pub fn comments(&self) -> &[ReviewThreadComment] {
        &self.comments.nodes
    }

    pub fn status(&self) -> ThreadStatus {
        if self.is_resolved {
            ThreadStatus::Resolved
        } else {
            ThreadStatus::Unresolved
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentConnection {
    pub nodes: Vec<ReviewThreadComment>,
}

/// A single message within a review thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewThreadComment {
    pub id: String,
    /// Numeric REST identifier; the target for replies.
    #[serde(default)]
    pub database_id: Option<u64>,
    pub body: String,
    pub path: String,
    pub line: Option<u64>,
    pub original_line: Option<u64>,
    pub author: Option<Author>,
    pub created_at: String,
    pub url: String,
}

impl ReviewThreadComment {
    /// The line shown for this comment, falling back to its original anchor.
    pub fn display_line(&self) -> Option<u64> {
        self.line.or(self.original_line)
    }

    /// `path:line`, or just `path` when the anchored code is gone.
    pub fn location(&self) -> String {
        match self.display_line() {
            Some(line) => format!("{}:{line}", self.path),
            None => self.path.clone(),
        }
    }

    /// Author login, `ghost` for deleted accounts.
    pub fn author_login(&self) -> &str {
        self.author
            .as_ref()
            .map(|author| author.login.as_str())
            .unwrap_or("ghost")
    }

    /// The identifier shown to users: the reply target when known.
    pub fn reference(&self) -> String {
        match self.database_id {
            Some(id) => format!("#{id}"),
            None => self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ThreadStatus {
    Resolved,
    Unresolved,
}

impl fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved => write!(f, "resolved"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Which threads a listing keeps.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ThreadFilter {
    #[default]
    All,
    ResolvedOnly,
    UnresolvedOnly,
}

impl ThreadFilter {
    /// Builds a filter from the `--resolved`/`--unresolved` flags.
    pub fn from_flags(resolved: bool, unresolved: bool) -> Result<Self> {
        match (resolved, unresolved) {
            (true, true) => Err(GhError::validation(
                "Cannot use --resolved and --unresolved together.",
            )),
            (true, false) => Ok(Self::ResolvedOnly),
            (false, true) => Ok(Self::UnresolvedOnly),
            (false, false) => Ok(Self::All),
        }
    }

    pub fn matches(self, thread: &ReviewThread) -> bool {
        match self {
            Self::All => true,
            Self::ResolvedOnly => thread.is_resolved,
            Self::UnresolvedOnly => !thread.is_resolved,
        }
    }

    /// Keeps matching threads in their original order.
    pub fn apply(self, threads: Vec<ReviewThread>) -> Vec<ReviewThread> {
        threads
            .into_iter()
            .filter(|thread| self.matches(thread))
            .collect()
    }
}

/// Outcome of normalizing a thread listing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewThreads {
    Found(Vec<ReviewThread>),
    PullRequestNotFound,
}
