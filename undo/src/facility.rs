//! The undo/redo capability set shared by the plain manager and the tracer.

use crate::action::{HandlerAction, TargetId, UndoAction, UndoHandler, UndoResult};

/// Operations of an undo/redo facility.
///
/// [`UndoManager`](crate::UndoManager) is the concrete implementation;
/// [`TracingUndoManager`](crate::TracingUndoManager) wraps any implementation
/// and records every call. `T` is the document type actions are applied to.
///
/// The trait is dyn-compatible, so hosts may hold a `Box<dyn UndoFacility<T>>`.
pub trait UndoFacility<T> {
    /// Opens a new (possibly nested) group.
    fn begin_undo_grouping(&mut self);

    /// Closes the innermost open group.
    ///
    /// Fails with [`UndoError::UnbalancedGrouping`](crate::UndoError::UnbalancedGrouping)
    /// when no group is open.
    fn end_undo_grouping(&mut self) -> UndoResult;

    /// Number of currently open groups.
    fn grouping_level(&self) -> usize;

    /// Whether a group is opened automatically on the first registration of
    /// an event and closed by [`end_event`](Self::end_event).
    fn groups_by_event(&self) -> bool;

    fn set_groups_by_event(&mut self, groups_by_event: bool);

    /// Closes the automatically opened group at the end of an event.
    fn end_event(&mut self);

    /// Maximum number of top-level groups kept on the undo stack (0 = unlimited).
    fn levels_of_undo(&self) -> usize;

    fn set_levels_of_undo(&mut self, levels: usize);

    /// Suspends registration; calls nest.
    fn disable_undo_registration(&mut self);

    /// Balances one [`disable_undo_registration`](Self::disable_undo_registration).
    fn enable_undo_registration(&mut self) -> UndoResult;

    fn is_undo_registration_enabled(&self) -> bool;

    /// Registers an action that reverts a change to `target`.
    fn register_undo(&mut self, target: TargetId, action: Box<dyn UndoAction<T>>) -> UndoResult;

    /// Registers a self-inverse closure (see [`HandlerAction`]).
    fn register_undo_handler(&mut self, target: TargetId, handler: UndoHandler<T>) -> UndoResult;

    /// Names the current top-level group (shown as "Undo <name>").
    fn set_action_name(&mut self, name: &str);

    /// Name of the open top-level group, or of the group on top of the undo stack.
    fn undo_action_name(&self) -> &str;

    /// Name of the group on top of the redo stack.
    fn redo_action_name(&self) -> &str;

    fn set_action_is_discardable(&mut self, discardable: bool);

    fn undo_action_is_discardable(&self) -> bool;

    /// Undoes the most recent top-level group.
    fn undo(&mut self, target: &mut T) -> UndoResult;

    /// Redoes the most recently undone group.
    fn redo(&mut self, target: &mut T) -> UndoResult;

    /// Undoes the last nested group of the open group, or the last top-level group.
    fn undo_nested_group(&mut self, target: &mut T) -> UndoResult;

    /// Clears both stacks, closes open groups and re-enables registration.
    fn remove_all_actions(&mut self);

    /// Drops every action registered for `target` from both stacks.
    fn remove_all_actions_with_target(&mut self, target: TargetId);

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    fn is_undoing(&self) -> bool;

    fn is_redoing(&self) -> bool;
}

/// Registration proxy bound to one target.
///
/// Returned by `prepare_invocation`; anything registered through it is
/// recorded for the bound target.
///
/// ```ignore
/// manager
///     .prepare_invocation(doc_id)
///     .handler(move |doc: &mut Document| std::mem::swap(&mut doc.name, &mut old))?;
/// ```
pub struct Invocation<'a, T> {
    facility: &'a mut dyn UndoFacility<T>,
    target: TargetId,
}

impl<'a, T: 'static> Invocation<'a, T> {
    pub(crate) fn new(facility: &'a mut dyn UndoFacility<T>, target: TargetId) -> Self {
        Self { facility, target }
    }

    /// The target this proxy registers for.
    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Registers `action` for the bound target.
    pub fn register(self, action: impl UndoAction<T> + 'static) -> UndoResult {
        self.facility.register_undo(self.target, Box::new(action))
    }

    /// Registers a self-inverse closure for the bound target.
    pub fn handler(self, handler: impl FnMut(&mut T) + Send + 'static) -> UndoResult {
        self.facility
            .register_undo(self.target, Box::new(HandlerAction::new(handler)))
    }
}
