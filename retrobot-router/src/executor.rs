//! Handler executor: permission and arity gate, failure isolation.

use retrobot_core::CommandContext;

use crate::error::DispatchError;
use crate::registry::CommandSpec;

/// Runs the handler behind `spec` for one invocation.
///
/// The permission predicate and required-argument check both short-circuit
/// without invoking the handler. Every failure the handler itself raises is
/// normalized to `HandlerFailure` here; nothing a handler does can crash the
/// router or abort processing of subsequent events.
///
/// Returns the id of the handler's visible reply, if it sent one, so the
/// caller can record the response pairing.
pub async fn execute(
    spec: &CommandSpec,
    ctx: &CommandContext,
) -> Result<Option<u64>, DispatchError> {
    if let Some(allowed) = spec.permission {
        if !allowed(ctx) {
            return Err(DispatchError::PermissionDenied(spec.name));
        }
    }
    if spec.requires_args && ctx.args.trim().is_empty() {
        return Err(DispatchError::MissingArgument(spec.name));
    }
    spec.handler
        .run(ctx)
        .await
        .map_err(|source| DispatchError::HandlerFailure {
            command: spec.name,
            source,
        })
}
