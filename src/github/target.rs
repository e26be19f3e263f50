//! Repository and pull request target resolution.

use crate::github::client::AmbientContext;
use crate::github::errors::{GhError, Result};
use std::fmt;
use std::str::FromStr;

/// Repository identity, optionally qualified by host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub host: Option<String>,
    pub owner: String,
    pub repo: String,
}

impl RepositoryRef {
    /// Parses `OWNER/REPO` or `HOST/OWNER/REPO`.
    ///
    /// Empty segments are ignored and the last two segments win, so
    /// `https://github.com/owner/repo` is accepted as well.
    pub fn parse(specifier: &str) -> Result<Self> {
        let segments: Vec<&str> = specifier
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        let [.., owner, repo] = segments.as_slice() else {
            return Err(GhError::validation(format!(
                "Invalid repository format: {specifier}. Expected OWNER/REPO or HOST/OWNER/REPO."
            )));
        };

        for segment in [owner, repo] {
            if !is_valid_name(segment) {
                return Err(GhError::validation(format!(
                    "Invalid repository format: {specifier}. `{segment}` is not a valid owner or repository name."
                )));
            }
        }

        let host = match segments.len() {
            len if len >= 3 => Some(segments[len - 3].to_owned()),
            _ => None,
        };

        Ok(Self {
            host,
            owner: (*owner).to_owned(),
            repo: (*repo).to_owned(),
        })
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepositoryRef {
    type Err = GhError;

    fn from_str(specifier: &str) -> Result<Self> {
        Self::parse(specifier)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A fully resolved repository and pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub repository: RepositoryRef,
    pub pull_request: u64,
}

/// Parses a user supplied pull request number, accepting `N` or `#N`.
pub fn parse_pull_number(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('#')
        .unwrap_or(trimmed)
        .parse::<u64>()
        .ok()
        .filter(|number| *number > 0)
        .ok_or_else(|| GhError::validation(format!("Invalid pull request number: {raw}")))
}

/// Resolves the repository from an explicit specifier or the ambient context.
pub async fn resolve_repository<A: AmbientContext>(
    ambient: &A,
    explicit: Option<&str>,
) -> Result<RepositoryRef> {
    match explicit {
        Some(specifier) => RepositoryRef::parse(specifier),
        None => current_repository(ambient).await,
    }
}

/// Resolves the full target. The repository is resolved before the pull request.
///
/// Explicit values are validated before any ambient lookup runs.
pub async fn resolve_target<A: AmbientContext>(
    ambient: &A,
    explicit_repo: Option<&str>,
    explicit_pull: Option<&str>,
) -> Result<Target> {
    let explicit_pull = explicit_pull.map(parse_pull_number).transpose()?;
    let explicit_repo = explicit_repo.map(RepositoryRef::parse).transpose()?;

    let repository = match explicit_repo {
        Some(repository) => repository,
        None => current_repository(ambient).await?,
    };
    let pull_request = match explicit_pull {
        Some(number) => number,
        None => {
            let current = ambient
                .current_pull_request()
                .await
                .map_err(GhError::resolution)?;
            tracing::debug!(pull_request = %current, "resolved pull request from context");
            current.trim().parse::<u64>().map_err(|_| {
                GhError::protocol(format!("current pull request number is not numeric: {current}"))
            })?
        }
    };

    Ok(Target {
        repository,
        pull_request,
    })
}

async fn current_repository<A: AmbientContext>(ambient: &A) -> Result<RepositoryRef> {
    let current = ambient
        .current_repository()
        .await
        .map_err(GhError::resolution)?;
    tracing::debug!(repository = %current, "resolved repository from context");

    // A malformed answer is the agent's fault, not the user's.
    RepositoryRef::parse(&current)
        .map_err(|error| GhError::protocol(format!("current repository is not usable: {error}")))
}

fn is_valid_name(segment: &str) -> bool {
    segment
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        && segment != "."
        && segment != ".."
}
