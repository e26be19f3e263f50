//! The `gh` process boundary: GraphQL/REST execution and ambient context.

use crate::github::errors::{GhError, Result};
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;

/// A named field passed to `gh api` alongside a document or route.
///
/// Values never become part of the GraphQL document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    /// Sent with `-f`, always a string on the wire.
    String { name: String, value: String },
    /// Sent with `-F`, typed as a JSON number by `gh`.
    Int { name: String, value: u64 },
}

impl Variable {
    pub fn string(name: &str, value: impl Into<String>) -> Self {
        Self::String {
            name: name.to_owned(),
            value: value.into(),
        }
    }

    pub fn int(name: &str, value: u64) -> Self {
        Self::Int {
            name: name.to_owned(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::String { name, .. } | Self::Int { name, .. } => name,
        }
    }

    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            Self::String { name, value } => {
                args.push("-f".to_owned());
                args.push(format!("{name}={value}"));
            }
            Self::Int { name, value } => {
                args.push("-F".to_owned());
                args.push(format!("{name}={value}"));
            }
        }
    }
}

/// HTTP method for REST calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A REST call routed through `gh api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub method: Method,
    pub route: String,
    pub fields: Vec<Variable>,
    pub host: Option<String>,
}

/// Request/response boundary for GitHub API calls.
///
/// Each call runs to completion before returning; nothing is retried.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Executes a GraphQL document with separately passed variables.
    async fn graphql(
        &self,
        document: &str,
        variables: &[Variable],
        host: Option<&str>,
    ) -> Result<Value>;

    /// Executes an authenticated REST call.
    async fn rest(&self, request: &RestRequest) -> Result<Value>;
}

/// Source of the repository and pull request implied by the working directory.
#[allow(async_fn_in_trait)]
pub trait AmbientContext {
    /// Returns the current repository as `OWNER/NAME` or `HOST/OWNER/NAME`.
    async fn current_repository(&self) -> Result<String>;

    /// Returns the pull request number for the current branch.
    async fn current_pull_request(&self) -> Result<String>;
}

/// Production gateway that shells out to the GitHub CLI.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    base_args: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GhRepoViewOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GhRepoViewPayload {
    name: String,
    owner: GhRepoViewOwner,
    #[serde(default)]
    url: Option<String>,
}

impl GhRepoViewPayload {
    /// `HOST/OWNER/NAME` when the repository URL names a host.
    fn qualified_name(&self) -> String {
        match self.url.as_deref().and_then(url_host) {
            Some(host) => format!("{host}/{}/{}", self.owner.login, self.name),
            None => format!("{}/{}", self.owner.login, self.name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GhPrViewPayload {
    number: u64,
}

impl GhCli {
    /// Builds a client from an already split command line such as `["gh"]`.
    pub fn new(command: Vec<String>) -> Result<Self> {
        let mut parts = command.into_iter();
        let program = parts
            .next()
            .filter(|program| !program.trim().is_empty())
            .ok_or_else(|| GhError::validation("agent command must not be empty"))?;

        Ok(Self {
            program,
            base_args: parts.collect(),
        })
    }

    #[cfg(test)]
    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(args)
            .output()
            .await
            .map_err(|source| GhError::AgentUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let status = output.status.code().unwrap_or(-1);
            tracing::debug!(status, "agent exited unsuccessfully");
            return Err(GhError::Transport {
                status,
                stderr: agent_stderr(&output.stderr),
            });
        }

        Ok(output.stdout)
    }

    async fn run_json(&self, args: &[String]) -> Result<Value> {
        let stdout = self.run(args).await?;
        parse_json(&stdout)
    }
}

impl Gateway for GhCli {
    async fn graphql(
        &self,
        document: &str,
        variables: &[Variable],
        host: Option<&str>,
    ) -> Result<Value> {
        tracing::debug!(
            fields = ?variables.iter().map(Variable::name).collect::<Vec<_>>(),
            host,
            "gh api graphql"
        );
        let args = graphql_args(document, variables, host);
        let response = self.run_json(&args).await?;
        check_graphql_errors(&response)?;
        Ok(response)
    }

    async fn rest(&self, request: &RestRequest) -> Result<Value> {
        tracing::debug!(
            method = request.method.as_str(),
            route = %request.route,
            fields = ?request.fields.iter().map(Variable::name).collect::<Vec<_>>(),
            "gh api"
        );
        self.run_json(&rest_args(request)).await
    }
}

impl AmbientContext for GhCli {
    async fn current_repository(&self) -> Result<String> {
        tracing::debug!("resolving repository from `gh repo view`");
        let args = ["repo", "view", "--json", "name,owner,url"].map(str::to_owned);
        let payload: GhRepoViewPayload =
            serde_json::from_slice(&self.run(&args).await?).map_err(|error| {
                GhError::protocol(format!("failed to parse `gh repo view` output: {error}"))
            })?;

        Ok(payload.qualified_name())
    }

    async fn current_pull_request(&self) -> Result<String> {
        tracing::debug!("resolving pull request from `gh pr view`");
        let args = ["pr", "view", "--json", "number"].map(str::to_owned);
        let payload: GhPrViewPayload =
            serde_json::from_slice(&self.run(&args).await?).map_err(|error| {
                GhError::protocol(format!("failed to parse `gh pr view` output: {error}"))
            })?;

        Ok(payload.number.to_string())
    }
}

fn graphql_args(document: &str, variables: &[Variable], host: Option<&str>) -> Vec<String> {
    let mut args = vec!["api".to_owned(), "graphql".to_owned()];
    push_host(&mut args, host);
    args.push("-f".to_owned());
    args.push(format!("query={document}"));
    for variable in variables {
        variable.push_args(&mut args);
    }
    args
}

fn rest_args(request: &RestRequest) -> Vec<String> {
    let mut args = vec!["api".to_owned()];
    push_host(&mut args, request.host.as_deref());
    args.push("--method".to_owned());
    args.push(request.method.as_str().to_owned());
    args.push(request.route.clone());
    for field in &request.fields {
        field.push_args(&mut args);
    }
    args
}

fn push_host(args: &mut Vec<String>, host: Option<&str>) {
    if let Some(host) = host {
        args.push("--hostname".to_owned());
        args.push(host.to_owned());
    }
}

fn url_host(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.split('/').next().filter(|host| !host.is_empty())
}

fn agent_stderr(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr).trim_end().to_owned()
}

fn parse_json(stdout: &[u8]) -> Result<Value> {
    serde_json::from_slice(stdout)
        .map_err(|error| GhError::protocol(format!("invalid JSON output: {error}")))
}

fn check_graphql_errors(response: &Value) -> Result<()> {
    if let Some(errors) = response.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let message = errors
                .iter()
                .map(|value| {
                    value
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                        .unwrap_or_else(|| value.to_string())
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GhError::GraphQl(message));
        }
    }

    Ok(())
}
