//! Undoable actions and the identities of the objects they edit.
//!
//! This module defines the pieces that get registered with an
//! [`UndoFacility`](crate::UndoFacility):
//!
//! - [`UndoAction`] - a reversible operation (Command pattern)
//! - [`HandlerAction`] - an [`UndoAction`] built from a self-inverse closure
//! - [`TargetId`] - identity of the object an action operates on
//! - [`UndoError`] / [`UndoResult`] - error handling for the facility

use std::fmt;

use thiserror::Error;

/// Identity of the object an undo action operates on.
///
/// Actions are registered together with the target they modify so that
/// [`remove_all_actions_with_target`](crate::UndoFacility::remove_all_actions_with_target)
/// can drop everything belonging to an object that went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    /// Creates a target identity from a raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for TargetId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Errors reported by an undo facility.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    /// An action was registered while no group was open and event grouping is off.
    #[error("no undo group is open")]
    NoOpenGroup,
    /// `end_undo_grouping` was called without a matching begin.
    #[error("end_undo_grouping called without an open group")]
    UnbalancedGrouping,
    /// Undo or redo was requested while a group is still open.
    #[error("cannot undo or redo while {0} group(s) are open")]
    GroupOpen(usize),
    /// `enable_undo_registration` was called more often than it was disabled.
    #[error("undo registration is not disabled")]
    RegistrationNotDisabled,
    /// The undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,
    /// The redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,
    /// An action failed while being undone or redone.
    #[error("action failed: {0}")]
    ActionFailed(String),
}

/// Result type for undo operations.
pub type UndoResult<T = ()> = Result<T, UndoError>;

/// A reversible operation registered with an undo facility.
///
/// The action has already been performed when it is registered. Undoing
/// calls [`undo`](Self::undo), redoing calls [`redo`](Self::redo); each
/// implementation stores whatever it needs (old/new values, indices, ...).
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct Rename {
///     old: String,
///     new: String,
/// }
///
/// impl UndoAction<Document> for Rename {
///     fn undo(&mut self, doc: &mut Document) -> UndoResult {
///         doc.name = self.old.clone();
///         Ok(())
///     }
///
///     fn redo(&mut self, doc: &mut Document) -> UndoResult {
///         doc.name = self.new.clone();
///         Ok(())
///     }
///
///     fn description(&self) -> &str {
///         "Rename"
///     }
/// }
/// ```
pub trait UndoAction<T>: fmt::Debug + Send {
    /// Reverts the change.
    fn undo(&mut self, target: &mut T) -> UndoResult;

    /// Performs the change again after it was undone.
    fn redo(&mut self, target: &mut T) -> UndoResult;

    /// A short, human-readable description.
    fn description(&self) -> &str {
        "action"
    }
}

/// Boxed self-inverse handler as accepted by
/// [`register_undo_handler`](crate::UndoFacility::register_undo_handler).
pub type UndoHandler<T> = Box<dyn FnMut(&mut T) + Send>;

/// An [`UndoAction`] backed by a self-inverse closure.
///
/// The same closure runs for undo and for redo, so it must toggle the
/// target between the two states, typically by swapping a captured value
/// with the live one:
///
/// ```ignore
/// let mut previous = String::from("Untitled");
/// let action = HandlerAction::new(move |doc: &mut Document| {
///     std::mem::swap(&mut doc.name, &mut previous);
/// });
/// ```
pub struct HandlerAction<T> {
    handler: UndoHandler<T>,
}

impl<T> HandlerAction<T> {
    /// Wraps a self-inverse closure.
    pub fn new(handler: impl FnMut(&mut T) + Send + 'static) -> Self {
        Self {
            handler: Box::new(handler),
        }
    }

    /// Wraps an already boxed handler.
    pub fn from_boxed(handler: UndoHandler<T>) -> Self {
        Self { handler }
    }
}

impl<T> fmt::Debug for HandlerAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerAction").finish_non_exhaustive()
    }
}

impl<T> UndoAction<T> for HandlerAction<T> {
    fn undo(&mut self, target: &mut T) -> UndoResult {
        (self.handler)(target);
        Ok(())
    }

    fn redo(&mut self, target: &mut T) -> UndoResult {
        (self.handler)(target);
        Ok(())
    }

    fn description(&self) -> &str {
        "handler"
    }
}
