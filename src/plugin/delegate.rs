//! Hand-off from a group to its nested default group.

use super::instance::dispatch;
use super::{ArgCursor, CommandNode, Dispatch, DispatchContext, PluginError, PluginResult};
use super::{RouteRequest, RouterPolicy};

/// Delegate a command a group could not resolve to its default group.
///
/// A child router sees the parent's window unchanged: the first argument
/// after the command plus the command itself. Without a router the window
/// shifts one position, so the first argument becomes the child's command.
pub fn delegate(
    child: &CommandNode,
    cursor: ArgCursor<'_>,
    ctx: &mut DispatchContext<'_>,
    policy: RouterPolicy,
) -> PluginResult<Dispatch> {
    if let Some(router) = child.router() {
        tracing::debug!(
            command = cursor.command.unwrap_or_default(),
            depth = child.depth(),
            "Routing through default group router"
        );

        let request = RouteRequest {
            first: cursor.first(),
            rest: cursor.tail(),
            command: cursor.command,
            pass_through: ctx.pass_through(),
            locals: ctx.locals(),
        };
        let code = router.route(&request).map_err(|source| PluginError::Execution {
            command: cursor.command.unwrap_or_default().to_string(),
            source,
        })?;
        return Ok(Dispatch::Delegated(Box::new(Dispatch::Routed(code))));
    }

    let shifted = cursor.shift();
    tracing::debug!(
        command = shifted.command.unwrap_or_default(),
        parent = shifted.parent.unwrap_or_default(),
        depth = child.depth(),
        "Delegating to default group"
    );

    let inner = dispatch(child, shifted, ctx, policy)?;
    Ok(Dispatch::Delegated(Box::new(inner)))
}
