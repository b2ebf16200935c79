//! Per-invocation dispatch state, argument window and outcomes.

use super::{HelpEntry, Locals, PluginResult};
use crate::output::Printer;

/// Hint printed after a listing when no header was shown.
pub const HELP_HINT: &str = "To display help add 'help': <plugin> <command> help";

/// State threaded through one top-level dispatch and every nested delegation.
pub struct DispatchContext<'p> {
    printer: &'p mut dyn Printer,
    banner_shown: bool,
    pass_through: bool,
    host_version: Option<String>,
    program: String,
    locals: Locals,
}

impl<'p> DispatchContext<'p> {
    /// Create a context printing through `printer`.
    pub fn new(printer: &'p mut dyn Printer) -> Self {
        Self {
            printer,
            banner_shown: false,
            pass_through: false,
            host_version: None,
            program: crate::APP_NAME.to_string(),
            locals: Locals::new(),
        }
    }

    /// Show a one-time header with this host version above the first listing.
    #[must_use]
    pub fn with_host_version(mut self, version: impl Into<String>) -> Self {
        self.host_version = Some(version.into());
        self
    }

    /// Label printed before every help entry.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Caller-supplied context forwarded to routers and handlers.
    #[must_use]
    pub fn with_locals(mut self, locals: Locals) -> Self {
        self.locals = locals;
        self
    }

    /// Whether the listing header has already been printed.
    pub fn banner_shown(&self) -> bool {
        self.banner_shown
    }

    /// Whether the current top-level call runs in pass-through mode.
    pub fn pass_through(&self) -> bool {
        self.pass_through
    }

    pub(crate) fn set_pass_through(&mut self, pass_through: bool) {
        self.pass_through = pass_through;
    }

    /// Caller-supplied context.
    pub fn locals(&self) -> &Locals {
        &self.locals
    }

    /// Output sink.
    pub fn printer(&mut self) -> &mut dyn Printer {
        &mut *self.printer
    }

    /// Print a help listing, with the header the first time around.
    pub fn print_listing(&mut self, entries: &[HelpEntry]) -> PluginResult<()> {
        if !self.banner_shown {
            if let Some(version) = &self.host_version {
                self.printer.header(version)?;
                self.banner_shown = true;
            }
        }

        for entry in entries {
            self.printer.help_entry(&self.program, entry)?;
        }

        if !self.banner_shown {
            self.printer.hint(HELP_HINT)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DispatchContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchContext")
            .field("banner_shown", &self.banner_shown)
            .field("pass_through", &self.pass_through)
            .field("host_version", &self.host_version)
            .field("program", &self.program)
            .field("locals", &self.locals)
            .finish()
    }
}

/// The argument window of one dispatch level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgCursor<'a> {
    /// Command at this level.
    pub command: Option<&'a str>,
    /// Arguments after the command.
    pub rest: &'a [String],
    /// Command consumed by the level above, if any.
    pub parent: Option<&'a str>,
}

impl<'a> ArgCursor<'a> {
    /// Window over a command and its arguments.
    pub fn new(command: Option<&'a str>, rest: &'a [String]) -> Self {
        Self { command, rest, parent: None }
    }

    /// The first argument after the command.
    pub fn first(&self) -> Option<&'a str> {
        self.rest.first().map(String::as_str)
    }

    /// Arguments after the first one.
    pub fn tail(&self) -> &'a [String] {
        self.rest.get(1..).unwrap_or(&[])
    }

    /// Shift the window one position left: the first argument becomes the
    /// command and the current command becomes the parent.
    #[must_use]
    pub fn shift(&self) -> Self {
        Self { command: self.first(), rest: self.tail(), parent: self.command }
    }
}

/// Why help was displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpReason {
    /// No command, or the literal `help` command.
    Requested,
    /// `<command> help`: the command's own document was shown.
    CommandDoc(String),
    /// The command could not be resolved.
    NotFound(String),
}

/// Result of dispatching one command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Dispatch {
    /// A direct handler ran and returned this exit code.
    Handled(i32),
    /// A router ran and returned this exit code.
    Routed(i32),
    /// A nested default group took the command.
    Delegated(Box<Dispatch>),
    /// Help was displayed instead of running anything.
    HelpShown(HelpReason),
    /// Nothing matched and the plugin lets the caller try elsewhere.
    NotHandled,
}

impl Dispatch {
    /// Check whether the plugin took responsibility for the command.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::NotHandled)
    }

    /// The innermost outcome behind any delegation.
    pub fn innermost(&self) -> &Self {
        match self {
            Self::Delegated(inner) => inner.innermost(),
            other => other,
        }
    }

    /// Delegation depth.
    pub fn depth(&self) -> usize {
        match self {
            Self::Delegated(inner) => 1 + inner.depth(),
            _ => 0,
        }
    }

    /// Process exit code, or `None` when not handled.
    pub fn exit_code(&self) -> Option<i32> {
        match self.innermost() {
            Self::Handled(code) | Self::Routed(code) => Some(*code),
            Self::HelpShown(HelpReason::Requested | HelpReason::CommandDoc(_)) => Some(0),
            Self::HelpShown(HelpReason::NotFound(_)) => Some(1),
            Self::NotHandled | Self::Delegated(_) => None,
        }
    }
}
