//! User configuration loading from `~/.prthreads/config.toml`.
//!
//! The file is optional and never written by the tool.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".prthreads";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "PRTHREADS_CONFIG";
const AGENT_ENV: &str = "PRTHREADS_AGENT";

const DEFAULT_AGENT: &str = "gh";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application configuration after file and environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Agent command line, already split into program and arguments.
    pub agent: Vec<String>,
    /// Default tracing filter directive.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent: vec![DEFAULT_AGENT.to_owned()],
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

/// Loads configuration from `$PRTHREADS_CONFIG` or `~/.prthreads/config.toml`.
///
/// `PRTHREADS_AGENT` overrides `agent.command`.
pub fn load() -> Result<AppConfig> {
    let mut config = match config_path() {
        Some(path) => load_from_path(&path)?,
        None => AppConfig::default(),
    };

    if let Some(agent) = env::var_os(AGENT_ENV) {
        let agent = agent.to_string_lossy();
        if !agent.trim().is_empty() {
            config.agent = split_command(&agent)
                .with_context(|| format!("invalid {AGENT_ENV} value: {agent}"))?;
        }
    }

    Ok(config)
}

/// Loads configuration from a specific file; a missing file yields defaults.
pub fn load_from_path(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    parse(&content).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content).context("failed to parse TOML")?;
    raw.into_config()
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE))
}

fn split_command(command: &str) -> Result<Vec<String>> {
    let parts = shlex::split(command).ok_or_else(|| anyhow!("unbalanced quotes"))?;
    if parts.is_empty() {
        return Err(anyhow!("command must not be empty"));
    }
    Ok(parts)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    agent: RawAgent,
    log: RawLog,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct RawAgent {
    command: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct RawLog {
    level: Option<String>,
}

impl RawConfig {
    fn into_config(self) -> Result<AppConfig> {
        let defaults = AppConfig::default();

        let agent = match self.agent.command {
            Some(command) => split_command(&command)
                .with_context(|| format!("invalid value for `agent.command`: {command}"))?,
            None => defaults.agent,
        };

        let log_level = self
            .log
            .level
            .map(|level| level.trim().to_owned())
            .filter(|level| !level.is_empty())
            .unwrap_or(defaults.log_level);

        Ok(AppConfig { agent, log_level })
    }
}
