//! Grouped undo/redo stacks.
//!
//! [`UndoManager`] keeps a bounded undo stack of top-level groups and an
//! unbounded redo stack. Actions are registered into the innermost open
//! group; a nested group becomes a single entry of its parent when it is
//! closed. With event grouping on, the first registration of an event opens
//! a group that [`UndoFacility::end_event`] closes again.

use std::collections::VecDeque;
use std::fmt;

use crate::action::{HandlerAction, TargetId, UndoAction, UndoError, UndoHandler, UndoResult};
use crate::config::UndoConfig;
use crate::facility::{Invocation, UndoFacility};

/// Default maximum number of undo groups (0 = unlimited).
pub const DEFAULT_LEVELS_OF_UNDO: usize = 0;

enum Entry<T> {
    Action {
        target: TargetId,
        action: Box<dyn UndoAction<T>>,
    },
    Group(UndoGroup<T>),
}

/// A named span of actions that undo and redo as one unit.
struct UndoGroup<T> {
    name: String,
    discardable: bool,
    entries: Vec<Entry<T>>,
}

impl<T> UndoGroup<T> {
    fn new() -> Self {
        Self {
            name: String::new(),
            discardable: false,
            entries: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Undoes entries in reverse registration order.
    fn undo(&mut self, target: &mut T) -> UndoResult {
        for entry in self.entries.iter_mut().rev() {
            match entry {
                Entry::Action { action, .. } => action.undo(target)?,
                Entry::Group(group) => group.undo(target)?,
            }
        }
        Ok(())
    }

    fn redo(&mut self, target: &mut T) -> UndoResult {
        for entry in self.entries.iter_mut() {
            match entry {
                Entry::Action { action, .. } => action.redo(target)?,
                Entry::Group(group) => group.redo(target)?,
            }
        }
        Ok(())
    }

    /// Drops actions for `id`, including nested groups left empty.
    fn remove_target(&mut self, id: TargetId) {
        self.entries.retain_mut(|entry| match entry {
            Entry::Action { target, .. } => *target != id,
            Entry::Group(group) => {
                group.remove_target(id);
                !group.is_empty()
            }
        });
    }

    fn action_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Action { .. } => 1,
                Entry::Group(group) => group.action_count(),
            })
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Undoing,
    Redoing,
}

/// The default [`UndoFacility`] implementation.
///
/// # Example
///
/// ```ignore
/// let mut undo = UndoManager::new();
/// let mut doc = Document::default();
///
/// undo.begin_undo_grouping();
/// doc.name = "Draft".into();
/// undo.register_undo(DOC, Box::new(Rename::new("Untitled", "Draft")))?;
/// undo.set_action_name("Rename");
/// undo.end_undo_grouping()?;
///
/// undo.undo(&mut doc)?;
/// ```
pub struct UndoManager<T> {
    undo_stack: VecDeque<UndoGroup<T>>,
    redo_stack: Vec<UndoGroup<T>>,
    open_groups: Vec<UndoGroup<T>>,
    /// Set when the outermost open group was opened by a registration.
    auto_group_open: bool,
    groups_by_event: bool,
    levels_of_undo: usize,
    disable_count: usize,
    state: State,
}

impl<T: 'static> UndoManager<T> {
    /// Creates an empty manager with event grouping on and unlimited levels.
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            open_groups: Vec::new(),
            auto_group_open: false,
            groups_by_event: true,
            levels_of_undo: DEFAULT_LEVELS_OF_UNDO,
            disable_count: 0,
            state: State::Idle,
        }
    }

    /// Creates a manager configured from the `[undo]` config section.
    pub fn from_config(config: &UndoConfig) -> Self {
        let mut manager = Self::new();
        manager.groups_by_event = config.groups_by_event;
        manager.levels_of_undo = config.levels_of_undo;
        manager
    }

    /// Returns a proxy that registers actions for `target`.
    pub fn prepare_invocation(&mut self, target: TargetId) -> Invocation<'_, T> {
        Invocation::new(self, target)
    }

    /// Number of groups on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of groups on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Number of actions in the group on top of the undo stack.
    pub fn top_undo_action_count(&self) -> usize {
        self.undo_stack.back().map_or(0, UndoGroup::action_count)
    }

    /// Name the setters apply to: the outermost open group, else the undo top.
    fn current_group_mut(&mut self) -> Option<&mut UndoGroup<T>> {
        if self.open_groups.is_empty() {
            self.undo_stack.back_mut()
        } else {
            self.open_groups.first_mut()
        }
    }

    fn current_group(&self) -> Option<&UndoGroup<T>> {
        self.open_groups.first().or_else(|| self.undo_stack.back())
    }

    fn push_undo(&mut self, group: UndoGroup<T>) {
        self.undo_stack.push_back(group);
        if self.levels_of_undo > 0 {
            while self.undo_stack.len() > self.levels_of_undo {
                self.undo_stack.pop_front();
            }
        }
    }

    fn close_event_group(&mut self) {
        if self.groups_by_event && self.open_groups.len() == 1 {
            // A single open group always exists here, so this cannot fail.
            let _ = self.end_undo_grouping();
        }
    }

    fn pop_nested_group(&mut self) -> Option<UndoGroup<T>> {
        let open = self.open_groups.last_mut()?;
        if !matches!(open.entries.last(), Some(Entry::Group(_))) {
            return None;
        }
        match open.entries.pop() {
            Some(Entry::Group(group)) => Some(group),
            _ => None,
        }
    }

    fn run(&mut self, state: State, group: &mut UndoGroup<T>, target: &mut T) -> UndoResult {
        self.state = state;
        let result = match state {
            State::Redoing => group.redo(target),
            _ => group.undo(target),
        };
        self.state = State::Idle;
        result
    }
}

impl<T: 'static> Default for UndoManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> UndoFacility<T> for UndoManager<T> {
    fn begin_undo_grouping(&mut self) {
        self.open_groups.push(UndoGroup::new());
    }

    fn end_undo_grouping(&mut self) -> UndoResult {
        let group = self
            .open_groups
            .pop()
            .ok_or(UndoError::UnbalancedGrouping)?;

        if let Some(parent) = self.open_groups.last_mut() {
            if !group.is_empty() {
                parent.entries.push(Entry::Group(group));
            }
        } else {
            self.auto_group_open = false;
            if !group.is_empty() {
                self.push_undo(group);
            }
        }
        Ok(())
    }

    fn grouping_level(&self) -> usize {
        self.open_groups.len()
    }

    fn groups_by_event(&self) -> bool {
        self.groups_by_event
    }

    fn set_groups_by_event(&mut self, groups_by_event: bool) {
        self.groups_by_event = groups_by_event;
    }

    fn end_event(&mut self) {
        if self.auto_group_open {
            self.close_event_group();
        }
    }

    fn levels_of_undo(&self) -> usize {
        self.levels_of_undo
    }

    fn set_levels_of_undo(&mut self, levels: usize) {
        self.levels_of_undo = levels;
        if levels > 0 {
            while self.undo_stack.len() > levels {
                self.undo_stack.pop_front();
            }
            // The next redo sits at the end of the stack; drop the far end.
            let excess = self.redo_stack.len().saturating_sub(levels);
            self.redo_stack.drain(..excess);
        }
    }

    fn disable_undo_registration(&mut self) {
        self.disable_count += 1;
    }

    fn enable_undo_registration(&mut self) -> UndoResult {
        self.disable_count = self
            .disable_count
            .checked_sub(1)
            .ok_or(UndoError::RegistrationNotDisabled)?;
        Ok(())
    }

    fn is_undo_registration_enabled(&self) -> bool {
        self.disable_count == 0
    }

    fn register_undo(&mut self, target: TargetId, action: Box<dyn UndoAction<T>>) -> UndoResult {
        if self.disable_count > 0 {
            return Ok(());
        }

        if self.open_groups.is_empty() {
            if !self.groups_by_event {
                return Err(UndoError::NoOpenGroup);
            }
            self.begin_undo_grouping();
            self.auto_group_open = true;
        }

        // A fresh edit invalidates everything that could be redone.
        if self.state == State::Idle {
            self.redo_stack.clear();
        }

        if let Some(group) = self.open_groups.last_mut() {
            group.entries.push(Entry::Action { target, action });
        }
        Ok(())
    }

    fn register_undo_handler(&mut self, target: TargetId, handler: UndoHandler<T>) -> UndoResult {
        self.register_undo(target, Box::new(HandlerAction::from_boxed(handler)))
    }

    fn set_action_name(&mut self, name: &str) {
        if let Some(group) = self.current_group_mut() {
            group.name = name.to_owned();
        }
    }

    fn undo_action_name(&self) -> &str {
        self.current_group().map_or("", |group| group.name.as_str())
    }

    fn redo_action_name(&self) -> &str {
        self.redo_stack.last().map_or("", |group| group.name.as_str())
    }

    fn set_action_is_discardable(&mut self, discardable: bool) {
        if let Some(group) = self.current_group_mut() {
            group.discardable = discardable;
        }
    }

    fn undo_action_is_discardable(&self) -> bool {
        self.current_group().is_some_and(|group| group.discardable)
    }

    fn undo(&mut self, target: &mut T) -> UndoResult {
        self.close_event_group();
        if !self.open_groups.is_empty() {
            return Err(UndoError::GroupOpen(self.open_groups.len()));
        }

        let mut group = self.undo_stack.pop_back().ok_or(UndoError::NothingToUndo)?;
        self.run(State::Undoing, &mut group, target)?;
        self.redo_stack.push(group);
        Ok(())
    }

    fn redo(&mut self, target: &mut T) -> UndoResult {
        self.close_event_group();
        if !self.open_groups.is_empty() {
            return Err(UndoError::GroupOpen(self.open_groups.len()));
        }

        let mut group = self.redo_stack.pop().ok_or(UndoError::NothingToRedo)?;
        self.run(State::Redoing, &mut group, target)?;
        self.push_undo(group);
        Ok(())
    }

    fn undo_nested_group(&mut self, target: &mut T) -> UndoResult {
        match self.pop_nested_group() {
            Some(mut group) => {
                self.run(State::Undoing, &mut group, target)?;
                self.redo_stack.push(group);
                Ok(())
            }
            None => self.undo(target),
        }
    }

    fn remove_all_actions(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_groups.clear();
        self.auto_group_open = false;
        self.disable_count = 0;
    }

    fn remove_all_actions_with_target(&mut self, target: TargetId) {
        for group in self
            .undo_stack
            .iter_mut()
            .chain(self.redo_stack.iter_mut())
            .chain(self.open_groups.iter_mut())
        {
            group.remove_target(target);
        }
        self.undo_stack.retain(|group| !group.is_empty());
        self.redo_stack.retain(|group| !group.is_empty());
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
            || self.open_groups.first().is_some_and(|group| !group.is_empty())
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn is_undoing(&self) -> bool {
        self.state == State::Undoing
    }

    fn is_redoing(&self) -> bool {
        self.state == State::Redoing
    }
}

impl<T> fmt::Debug for UndoManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoManager")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("grouping_level", &self.open_groups.len())
            .field("groups_by_event", &self.groups_by_event)
            .field("levels_of_undo", &self.levels_of_undo)
            .field("disable_count", &self.disable_count)
            .finish()
    }
}
