//! GitHub integration through the `gh` command-line agent.

pub mod client;
pub mod errors;
pub mod target;
pub mod threads;
