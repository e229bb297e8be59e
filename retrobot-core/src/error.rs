//! Error enums shared across the workspace.

use std::time::Duration;

use thiserror::Error;

/// Failure surface of the messaging platform collaborator.
///
/// `NotFound` and `Forbidden` are distinguished because retraction treats
/// them as non-fatal (the reply is already gone or cannot be deleted).
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("message not found")]
    NotFound,

    #[error("missing permission for the requested operation")]
    Forbidden,

    #[error("chat platform error: {0}")]
    Other(String),
}

/// Failure surface of the generative service clients.
/// Never crosses the executor boundary un-normalized.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("service returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Any failure raised inside a command handler. The executor converts these
/// into the dispatch-level taxonomy; they never crash the router.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
