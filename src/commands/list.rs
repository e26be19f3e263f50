//! `list`: review threads for a pull request.

use crate::domain::{ReviewThreads, ThreadFilter};
use crate::github::client::{AmbientContext, Gateway};
use crate::github::errors::{GhError, Result};
use crate::github::target::resolve_target;
use crate::github::threads::fetch_review_threads;
use crate::render::thread::{render_threads_json, render_threads_text};

/// Inputs of the `list` command as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Positional pull request arguments; more than one is rejected.
    pub pulls: Vec<String>,
    pub repo: Option<String>,
    pub resolved: bool,
    pub unresolved: bool,
    pub json: bool,
}

/// Lists review threads and returns the text to print.
pub async fn run_list<G, A>(gateway: &G, ambient: &A, request: &ListRequest) -> Result<String>
where
    G: Gateway,
    A: AmbientContext,
{
    if request.pulls.len() > 1 {
        return Err(GhError::validation(format!(
            "Expected at most one pull request argument, got {}.",
            request.pulls.len()
        )));
    }
    let filter = ThreadFilter::from_flags(request.resolved, request.unresolved)?;

    let target = resolve_target(
        ambient,
        request.repo.as_deref(),
        request.pulls.first().map(String::as_str),
    )
    .await?;

    let threads = match fetch_review_threads(gateway, &target).await? {
        ReviewThreads::Found(threads) => threads,
        ReviewThreads::PullRequestNotFound => {
            return Err(GhError::not_found(format!(
                "Pull request #{} not found in {}.",
                target.pull_request, target.repository
            )));
        }
    };

    let total = threads.len();
    let threads = filter.apply(threads);
    tracing::debug!(total, shown = threads.len(), ?filter, "filtered review threads");

    if request.json {
        render_threads_json(&threads)
    } else {
        Ok(render_threads_text(&threads))
    }
}

#[cfg(test)]
mod tests {
    use super::{ListRequest, run_list};
    use crate::fixtures::{Call, FakeGh, listing_payload};
    use crate::github::client::Variable;
    use crate::github::errors::GhError;
    use serde_json::{Value, json};

    fn request(pull: &str) -> ListRequest {
        ListRequest {
            pulls: vec![pull.to_owned()],
            repo: Some("octo/widgets".to_owned()),
            ..ListRequest::default()
        }
    }

    #[tokio::test]
    async fn conflicting_filters_fail_before_any_call() {
        let gh = FakeGh::default()
            .with_repository(Ok("octo/widgets".to_owned()))
            .with_pull_request(Ok("7".to_owned()))
            .respond(Ok(listing_payload(&[("T1", true)])));
        let request = ListRequest {
            resolved: true,
            unresolved: true,
            ..ListRequest::default()
        };

        let error = run_list(&gh, &gh, &request).await.unwrap_err();

        assert!(error.is_validation());
        assert!(gh.calls().is_empty());
    }

    #[tokio::test]
    async fn multiple_pull_arguments_fail_before_resolution() {
        let gh = FakeGh::default().with_repository(Ok("octo/widgets".to_owned()));
        let request = ListRequest {
            pulls: vec!["1".to_owned(), "2".to_owned()],
            ..ListRequest::default()
        };

        let error = run_list(&gh, &gh, &request).await.unwrap_err();

        assert!(error.is_validation());
        assert!(gh.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_listing_prints_literal() {
        let gh = FakeGh::default().respond(Ok(listing_payload(&[])));
        let output = run_list(&gh, &gh, &request("7")).await.unwrap();
        assert_eq!(output, "No review comments found.");
    }

    #[tokio::test]
    async fn filtered_to_nothing_prints_literal() {
        let gh = FakeGh::default().respond(Ok(listing_payload(&[("T1", true)])));
        let request = ListRequest {
            unresolved: true,
            ..request("7")
        };

        let output = run_list(&gh, &gh, &request).await.unwrap();
        assert_eq!(output, "No review comments found.");
    }

    #[tokio::test]
    async fn sends_target_as_variables() {
        let gh = FakeGh::default().respond(Ok(listing_payload(&[("T1", false)])));

        let output = run_list(&gh, &gh, &request("#7")).await.unwrap();

        assert!(output.starts_with("[T1] unresolved\n  #1000 consensus/src/marshal/store.rs:18 @patrick-ogrady"));
        let calls = gh.calls();
        let [Call::GraphQl { variables, host, .. }] = calls.as_slice() else {
            panic!("expected one graphql call");
        };
        assert_eq!(
            variables,
            &[
                Variable::string("owner", "octo"),
                Variable::string("repo", "widgets"),
                Variable::int("pullNumber", 7),
            ]
        );
        assert_eq!(host, &None);
    }

    #[tokio::test]
    async fn json_mode_filters_inside_upstream_shape() {
        let gh = FakeGh::default().respond(Ok(listing_payload(&[
            ("T1", true),
            ("T2", false),
            ("T3", true),
        ])));
        let request = ListRequest {
            resolved: true,
            json: true,
            ..request("7")
        };

        let output = run_list(&gh, &gh, &request).await.unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        let nodes = value["data"]["repository"]["pullRequest"]["reviewThreads"]["nodes"]
            .as_array()
            .unwrap();

        let ids: Vec<&str> = nodes.iter().filter_map(|node| node["id"].as_str()).collect();
        assert_eq!(ids, ["T1", "T3"]);
    }

    #[tokio::test]
    async fn missing_pull_request_is_not_found() {
        let gh = FakeGh::default().respond(Ok(json!({
            "data": {"repository": {"pullRequest": null}}
        })));

        let error = run_list(&gh, &gh, &request("99")).await.unwrap_err();

        assert!(matches!(error, GhError::NotFound(_)));
        assert_eq!(error.to_string(), "Pull request #99 not found in octo/widgets.");
    }

    #[tokio::test]
    async fn omitted_target_is_resolved_from_context() {
        let gh = FakeGh::default()
            .with_repository(Ok("octo/widgets".to_owned()))
            .with_pull_request(Ok("12".to_owned()))
            .respond(Ok(listing_payload(&[])));

        run_list(&gh, &gh, &ListRequest::default()).await.unwrap();

        let calls = gh.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::CurrentRepository);
        assert_eq!(calls[1], Call::CurrentPullRequest);
    }

    #[tokio::test]
    async fn transport_failure_is_passed_through() {
        let gh = FakeGh::default().respond(Err(GhError::Transport {
            status: 1,
            stderr: "gh: Could not resolve to a Repository with the name 'octo/widgets'.".to_owned(),
        }));

        let error = run_list(&gh, &gh, &request("7")).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "gh: Could not resolve to a Repository with the name 'octo/widgets'."
        );
    }
}
