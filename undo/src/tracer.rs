//! Debug tracing decorator for undo facilities.
//!
//! [`TracingUndoManager`] forwards every call to the wrapped facility and
//! records a [`Step`] for it, producing an indented, human-readable log of
//! what happened to the undo stack. It also provides long-lived groups that
//! stay open across event boundaries (e.g. from mouse down to mouse up of a
//! drag), which plain event grouping would split up.
//!
//! Recording order matters to readers of the log: property setters and most
//! operations record before forwarding, while `end_undo_grouping` records
//! its name-missing warning before and its own step after forwarding.

use std::fmt;
use std::io::{self, Write};
use std::marker::PhantomData;

use crate::action::{TargetId, UndoAction, UndoHandler, UndoResult};
use crate::config::{DEFAULT_INDENT, UndoConfig};
use crate::facility::{Invocation, UndoFacility};
use crate::manager::UndoManager;
use crate::stack_trace::{self, TRACER_FRAMES};

/// Message recorded when a group is closed without an action name.
pub const MISSING_NAME_WARNING: &str = "WARNING: no undo name set for current group";

/// One recorded trace entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Indent unit repeated once per group level open at the time of the call.
    pub indent: String,
    pub message: String,
    /// Call stack of the registering code, innermost frame first.
    pub stack_trace: Option<Vec<String>>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.indent, self.message)
    }
}

/// Operations only available on the tracing decorator.
///
/// Code that needs them takes a `TracingUndoManager` (or an
/// `F: UndoFacility<T> + CustomUndoApi<T>` bound); a plain facility simply
/// does not implement this trait.
pub trait CustomUndoApi<T> {
    /// Opens a group that survives event boundaries. No-op if one is open.
    fn begin_long_lived_grouping(&mut self);

    /// Closes the long-lived group. No-op if none is open.
    fn end_long_lived_grouping(&mut self) -> UndoResult;

    /// Registers a self-inverse closure, labelling the trace step with
    /// `calling_function` (see [`function_name!`](crate::function_name)).
    fn register_undo_operation<H>(
        &mut self,
        target: TargetId,
        calling_function: &str,
        handler: H,
    ) -> UndoResult
    where
        H: FnMut(&mut T) + Send + 'static;

    /// Writes the rendered trace to stderr.
    fn print_debug_log(&self);
}

/// Undo facility decorator that records every operation.
///
/// # Example
///
/// ```ignore
/// let mut undo = TracingUndoManager::new(UndoManager::new());
/// undo.begin_undo_grouping();
/// undo.set_action_name("Rename");
/// undo.end_undo_grouping()?;
///
/// assert_eq!(
///     undo.render_debug_log(),
///     "begin_undo_grouping\n    action_name = \"Rename\"\nend_undo_grouping"
/// );
/// ```
pub struct TracingUndoManager<T, F = UndoManager<T>> {
    inner: F,
    debug_log: Vec<Step>,
    enable_debug_logging: bool,
    indent: String,
    long_lived_group_open: bool,
    _target: PhantomData<fn(&mut T)>,
}

impl<T: 'static> TracingUndoManager<T, UndoManager<T>> {
    /// Creates a tracer around a new [`UndoManager`], both configured from
    /// the `[undo]` section.
    pub fn from_config(config: &UndoConfig) -> Self {
        let mut tracer = Self::new(UndoManager::from_config(config));
        tracer.enable_debug_logging = config.enable_debug_logging;
        tracer.indent = config.indent.clone();
        tracer
    }
}

impl<T: 'static, F: UndoFacility<T>> TracingUndoManager<T, F> {
    /// Wraps `inner`. Tracing starts enabled with a four-space indent.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            debug_log: Vec::new(),
            enable_debug_logging: true,
            indent: DEFAULT_INDENT.to_owned(),
            long_lived_group_open: false,
            _target: PhantomData,
        }
    }

    /// Replaces the indent unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// The wrapped facility.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Unwraps the facility, discarding the trace.
    pub fn into_inner(self) -> F {
        self.inner
    }

    pub fn enable_debug_logging(&self) -> bool {
        self.enable_debug_logging
    }

    /// Turns recording on or off. Undo behavior is unaffected.
    pub fn set_enable_debug_logging(&mut self, enabled: bool) {
        self.enable_debug_logging = enabled;
    }

    /// All recorded steps, oldest first.
    pub fn debug_log(&self) -> &[Step] {
        &self.debug_log
    }

    pub fn clear_debug_log(&mut self) {
        self.debug_log.clear();
    }

    pub fn is_long_lived_group_open(&self) -> bool {
        self.long_lived_group_open
    }

    /// Records a step indented by the current grouping level.
    pub fn log_debug_step(&mut self, message: impl Into<String>, stack_trace: Option<Vec<String>>) {
        if !self.enable_debug_logging {
            return;
        }

        let indent = self.indent.repeat(self.inner.grouping_level());
        let message = message.into();
        log::trace!("{indent}{message}");
        self.debug_log.push(Step {
            indent,
            message,
            stack_trace,
        });
    }

    /// Renders every step as `<indent><message>`, one per line.
    pub fn render_debug_log(&self) -> String {
        self.debug_log
            .iter()
            .map(Step::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes the rendered trace, preceded by a blank line, to `out`.
    pub fn write_debug_log(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.render_debug_log())
    }

    /// Writes the trace to `out`, reporting a failed write through the
    /// logger instead of dropping it.
    fn emit_debug_log(&self, out: &mut impl Write) -> bool {
        match self.write_debug_log(out) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "Failed to print undo trace ({} steps): {e}",
                    self.debug_log.len()
                );
                false
            }
        }
    }

    /// Returns a proxy that registers actions for `target` on the wrapped
    /// facility; the preparation itself is traced with the caller's stack.
    #[inline(never)]
    pub fn prepare_invocation(&mut self, target: TargetId) -> Invocation<'_, T> {
        if self.enable_debug_logging {
            let trace = stack_trace::capture(TRACER_FRAMES);
            self.log_debug_step("prepare_invocation", Some(trace));
        }
        Invocation::new(&mut self.inner, target)
    }
}

impl<T: 'static, F: UndoFacility<T>> CustomUndoApi<T> for TracingUndoManager<T, F> {
    fn begin_long_lived_grouping(&mut self) {
        if self.long_lived_group_open {
            return;
        }
        self.long_lived_group_open = true;
        self.set_groups_by_event(false);
        self.begin_undo_grouping();
    }

    fn end_long_lived_grouping(&mut self) -> UndoResult {
        if !self.long_lived_group_open {
            return Ok(());
        }
        let result = self.end_undo_grouping();
        self.set_groups_by_event(true);
        self.long_lived_group_open = false;
        result
    }

    #[inline(never)]
    fn register_undo_operation<H>(
        &mut self,
        target: TargetId,
        calling_function: &str,
        handler: H,
    ) -> UndoResult
    where
        H: FnMut(&mut T) + Send + 'static,
    {
        if self.enable_debug_logging {
            // Captured here, not in a helper, so the fixed skip lands on the caller.
            let trace = stack_trace::capture(TRACER_FRAMES);
            let message = format!("register_undo_operation() from {calling_function}");
            self.log_debug_step(message, Some(trace));
        }
        self.inner.register_undo_handler(target, Box::new(handler))
    }

    fn print_debug_log(&self) {
        self.emit_debug_log(&mut io::stderr().lock());
    }
}

impl<T: 'static, F: UndoFacility<T>> UndoFacility<T> for TracingUndoManager<T, F> {
    fn begin_undo_grouping(&mut self) {
        self.log_debug_step("begin_undo_grouping", None);
        self.inner.begin_undo_grouping();
    }

    fn end_undo_grouping(&mut self) -> UndoResult {
        // The name is only readable while the group is still open.
        if self.inner.undo_action_name().is_empty() {
            self.log_debug_step(MISSING_NAME_WARNING, None);
        }
        let result = self.inner.end_undo_grouping();
        self.log_debug_step("end_undo_grouping", None);
        result
    }

    fn grouping_level(&self) -> usize {
        self.inner.grouping_level()
    }

    fn groups_by_event(&self) -> bool {
        self.inner.groups_by_event()
    }

    fn set_groups_by_event(&mut self, groups_by_event: bool) {
        self.log_debug_step(format!("groups_by_event = {groups_by_event}"), None);
        self.inner.set_groups_by_event(groups_by_event);
    }

    fn end_event(&mut self) {
        self.inner.end_event();
    }

    fn levels_of_undo(&self) -> usize {
        self.inner.levels_of_undo()
    }

    fn set_levels_of_undo(&mut self, levels: usize) {
        self.log_debug_step(format!("levels_of_undo = {levels}"), None);
        self.inner.set_levels_of_undo(levels);
    }

    fn disable_undo_registration(&mut self) {
        self.log_debug_step("disable_undo_registration", None);
        self.inner.disable_undo_registration();
    }

    fn enable_undo_registration(&mut self) -> UndoResult {
        self.log_debug_step("enable_undo_registration", None);
        self.inner.enable_undo_registration()
    }

    fn is_undo_registration_enabled(&self) -> bool {
        self.inner.is_undo_registration_enabled()
    }

    #[inline(never)]
    fn register_undo(&mut self, target: TargetId, action: Box<dyn UndoAction<T>>) -> UndoResult {
        if self.enable_debug_logging {
            let trace = stack_trace::capture(TRACER_FRAMES);
            self.log_debug_step("register_undo", Some(trace));
        }
        self.inner.register_undo(target, action)
    }

    #[inline(never)]
    fn register_undo_handler(&mut self, target: TargetId, handler: UndoHandler<T>) -> UndoResult {
        if self.enable_debug_logging {
            let trace = stack_trace::capture(TRACER_FRAMES);
            self.log_debug_step("register_undo_handler", Some(trace));
        }
        self.inner.register_undo_handler(target, handler)
    }

    fn set_action_name(&mut self, name: &str) {
        self.log_debug_step(format!("action_name = \"{name}\""), None);
        self.inner.set_action_name(name);
    }

    fn undo_action_name(&self) -> &str {
        self.inner.undo_action_name()
    }

    fn redo_action_name(&self) -> &str {
        self.inner.redo_action_name()
    }

    fn set_action_is_discardable(&mut self, discardable: bool) {
        self.log_debug_step(format!("set_action_is_discardable({discardable})"), None);
        self.inner.set_action_is_discardable(discardable);
    }

    fn undo_action_is_discardable(&self) -> bool {
        self.inner.undo_action_is_discardable()
    }

    fn undo(&mut self, target: &mut T) -> UndoResult {
        self.log_debug_step("undo", None);
        self.inner.undo(target)
    }

    fn redo(&mut self, target: &mut T) -> UndoResult {
        self.log_debug_step("redo", None);
        self.inner.redo(target)
    }

    fn undo_nested_group(&mut self, target: &mut T) -> UndoResult {
        self.log_debug_step("undo_nested_group", None);
        self.inner.undo_nested_group(target)
    }

    fn remove_all_actions(&mut self) {
        self.log_debug_step("remove_all_actions", None);
        self.inner.remove_all_actions();
    }

    fn remove_all_actions_with_target(&mut self, target: TargetId) {
        self.log_debug_step(format!("remove_all_actions_with_target({target})"), None);
        self.inner.remove_all_actions_with_target(target);
    }

    fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    fn is_undoing(&self) -> bool {
        self.inner.is_undoing()
    }

    fn is_redoing(&self) -> bool {
        self.inner.is_redoing()
    }
}

impl<T, F: fmt::Debug> fmt::Debug for TracingUndoManager<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingUndoManager")
            .field("inner", &self.inner)
            .field("steps", &self.debug_log.len())
            .field("enable_debug_logging", &self.enable_debug_logging)
            .field("long_lived_group_open", &self.long_lived_group_open)
            .finish()
    }
}

/// Expands to the path of the enclosing function, for labelling
/// [`register_undo_operation`](CustomUndoApi::register_undo_operation) steps.
///
/// ```ignore
/// fn rename(undo: &mut TracingUndoManager<Document>, doc: &mut Document) {
///     undo.register_undo_operation(DOC, function_name!(), handler)?;
///     // step reads "register_undo_operation() from my_app::rename"
/// }
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn marker() {}
        fn type_name_of<F>(_: F) -> &'static str {
            ::std::any::type_name::<F>()
        }
        let name = type_name_of(marker);
        name.strip_suffix("::marker").unwrap_or(name)
    }};
}
