//! Output renderers.

pub mod thread;
