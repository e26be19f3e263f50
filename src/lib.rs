//! prthreads library crate.

pub mod commands;
pub mod config;
pub mod domain;
#[cfg(test)]
pub mod fixtures;
pub mod github;
pub mod logging;
pub mod render;
