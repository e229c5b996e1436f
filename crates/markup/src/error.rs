//! Error types for tree operations
//!
//! Simple, flat error hierarchy. Every condition is recoverable at the
//! call that raised it; the cursor stays valid for further chaining.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarkupError>;

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("No root node set")]
    RootNotSet,

    #[error("Cannot close: cursor is at a root node")]
    CloseAtRoot,

    #[error("Alias not found: {alias}")]
    AliasNotFound { alias: String },

    #[error("Path '{path}' unresolved at segment '{segment}'")]
    PathNotResolved { path: String, segment: String },

    #[error("Child '{alias}' is still open and not registered yet")]
    ChildNotClosed { alias: String },

    #[error("Invalid identifier: {0:?}")]
    InvalidName(String),
}
