//! Command handlers.
//!
//! Each handler validates its input, resolves the target, performs its calls
//! in order, and returns the exact text for stdout. The first failure ends the
//! command; later steps never run.

pub mod list;
pub mod reply;
pub mod resolve;

pub use list::{ListRequest, run_list};
pub use reply::{ReplyRequest, run_reply};
pub use resolve::run_set_resolved;
