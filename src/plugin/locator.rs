//! Deciding which mechanism handles a command within one group.

use std::sync::Arc;

use super::{CommandHandler, CommandNode, Router, RouterPolicy, HELP_COMMAND};

/// What a group does with a command.
pub enum Resolution<'n> {
    /// The group router takes the command.
    Router(&'n Arc<dyn Router>),
    /// No command, or the literal `help`.
    HelpRequested,
    /// A direct handler for the command exists.
    DirectHandler(&'n Arc<dyn CommandHandler>),
    /// The nested default group takes the command.
    DefaultSubPlugin(&'n CommandNode),
    /// Nothing in this group can take the command.
    NotFound,
}

impl Resolution<'_> {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Router(_) => "router",
            Self::HelpRequested => "help",
            Self::DirectHandler(_) => "handler",
            Self::DefaultSubPlugin(_) => "default-group",
            Self::NotFound => "not-found",
        }
    }
}

impl std::fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

/// Locate the mechanism for an already canonical `command` in `node`.
///
/// With [`RouterPolicy::RouterFirst`] the order is router, help, direct
/// handler, default group. [`RouterPolicy::HandlerFirst`] checks help and the
/// direct handler before the router.
pub fn locate<'n>(
    node: &'n CommandNode,
    command: Option<&str>,
    policy: RouterPolicy,
) -> Resolution<'n> {
    let help_requested = command.is_none_or(|c| c == HELP_COMMAND);

    if policy == RouterPolicy::RouterFirst {
        if let Some(router) = node.router() {
            return Resolution::Router(router);
        }
    }

    if help_requested {
        return Resolution::HelpRequested;
    }

    if let Some(handler) = command.and_then(|c| node.registry().get(c)) {
        return Resolution::DirectHandler(handler);
    }

    if policy == RouterPolicy::HandlerFirst {
        if let Some(router) = node.router() {
            return Resolution::Router(router);
        }
    }

    match node.default_group() {
        Some(child) => Resolution::DefaultSubPlugin(child),
        None => Resolution::NotFound,
    }
}
