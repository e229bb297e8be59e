//! Dispatch-level error taxonomy.

use retrobot_core::HandlerError;
use thiserror::Error;

/// Why parsing or execution of a command failed. Transient: consumed once by
/// the router's error-reporting path, never stored.
///
/// Only `HandlerFailure` is logged as an error; the other variants are
/// ordinary user mistakes and produce a notice without a log entry.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown command `{0}`")]
    CommandNotFound(String),

    #[error("missing required argument for `{0}`")]
    MissingArgument(&'static str),

    #[error("permission denied for `{0}`")]
    PermissionDenied(&'static str),

    #[error("command `{command}` failed: {source}")]
    HandlerFailure {
        command: &'static str,
        #[source]
        source: HandlerError,
    },
}
