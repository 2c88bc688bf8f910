//! Resolve GitHub release references to cached local binaries and run them.
//!
//! The core pipeline lives in [`pipeline::resolve_binary`]; the modules
//! underneath it are exposed for testing and embedding.

pub mod api;
pub mod cache;
pub mod download;
pub mod error;
pub mod extract;
pub mod locate;
pub mod matcher;
pub mod pipeline;
pub mod platform;
pub mod reference;
pub mod runner;

pub use error::{GhrunError, Result};
pub use reference::RepoReference;
