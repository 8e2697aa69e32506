//! Shared fixtures for the undo integration tests.

use utilkit_undo::{TargetId, UndoAction, UndoFacility, UndoHandler, UndoManager, UndoResult};

pub const DOC: TargetId = TargetId::new(1);
pub const LAYER: TargetId = TargetId::new(2);

/// A tiny editable document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub x: i32,
}

/// Moves the document by `dx`; undo moves it back.
#[derive(Debug)]
pub struct Move {
    pub dx: i32,
}

impl UndoAction<Document> for Move {
    fn undo(&mut self, doc: &mut Document) -> UndoResult {
        doc.x -= self.dx;
        Ok(())
    }

    fn redo(&mut self, doc: &mut Document) -> UndoResult {
        doc.x += self.dx;
        Ok(())
    }

    fn description(&self) -> &str {
        "Move"
    }
}

/// Call counts observed by [`SpyFacility`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub begin: usize,
    pub end: usize,
    pub register: usize,
    pub set_groups_by_event: usize,
}

/// Facility that forwards to an [`UndoManager`] and counts calls.
#[derive(Debug, Default)]
pub struct SpyFacility {
    pub inner: UndoManager<Document>,
    pub calls: Calls,
}

impl UndoFacility<Document> for SpyFacility {
    fn begin_undo_grouping(&mut self) {
        self.calls.begin += 1;
        self.inner.begin_undo_grouping();
    }

    fn end_undo_grouping(&mut self) -> UndoResult {
        self.calls.end += 1;
        self.inner.end_undo_grouping()
    }

    fn grouping_level(&self) -> usize {
        self.inner.grouping_level()
    }

    fn groups_by_event(&self) -> bool {
        self.inner.groups_by_event()
    }

    fn set_groups_by_event(&mut self, groups_by_event: bool) {
        self.calls.set_groups_by_event += 1;
        self.inner.set_groups_by_event(groups_by_event);
    }

    fn end_event(&mut self) {
        self.inner.end_event();
    }

    fn levels_of_undo(&self) -> usize {
        self.inner.levels_of_undo()
    }

    fn set_levels_of_undo(&mut self, levels: usize) {
        self.inner.set_levels_of_undo(levels);
    }

    fn disable_undo_registration(&mut self) {
        self.inner.disable_undo_registration();
    }

    fn enable_undo_registration(&mut self) -> UndoResult {
        self.inner.enable_undo_registration()
    }

    fn is_undo_registration_enabled(&self) -> bool {
        self.inner.is_undo_registration_enabled()
    }

    fn register_undo(
        &mut self,
        target: TargetId,
        action: Box<dyn UndoAction<Document>>,
    ) -> UndoResult {
        self.calls.register += 1;
        self.inner.register_undo(target, action)
    }

    fn register_undo_handler(
        &mut self,
        target: TargetId,
        handler: UndoHandler<Document>,
    ) -> UndoResult {
        self.calls.register += 1;
        self.inner.register_undo_handler(target, handler)
    }

    fn set_action_name(&mut self, name: &str) {
        self.inner.set_action_name(name);
    }

    fn undo_action_name(&self) -> &str {
        self.inner.undo_action_name()
    }

    fn redo_action_name(&self) -> &str {
        self.inner.redo_action_name()
    }

    fn set_action_is_discardable(&mut self, discardable: bool) {
        self.inner.set_action_is_discardable(discardable);
    }

    fn undo_action_is_discardable(&self) -> bool {
        self.inner.undo_action_is_discardable()
    }

    fn undo(&mut self, target: &mut Document) -> UndoResult {
        self.inner.undo(target)
    }

    fn redo(&mut self, target: &mut Document) -> UndoResult {
        self.inner.redo(target)
    }

    fn undo_nested_group(&mut self, target: &mut Document) -> UndoResult {
        self.inner.undo_nested_group(target)
    }

    fn remove_all_actions(&mut self) {
        self.inner.remove_all_actions();
    }

    fn remove_all_actions_with_target(&mut self, target: TargetId) {
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
