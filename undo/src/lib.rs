//! # utilkit-undo
//!
//! Grouped undo/redo with an optional debug tracer.
//!
//! - [`UndoAction`] - a reversible operation registered with a facility
//! - [`UndoFacility`] - the undo/redo capability set (grouping, registration,
//!   undo/redo, naming, event grouping)
//! - [`UndoManager`] - the default facility
//! - [`TracingUndoManager`] - decorator recording an indented [`Step`] for
//!   every operation, plus long-lived groups via [`CustomUndoApi`]
//!
//! # Event grouping
//!
//! With [`groups_by_event`](UndoFacility::groups_by_event) on (the default),
//! the first registration of an input event opens a group and the host
//! closes it by calling [`end_event`](UndoFacility::end_event) once the event
//! has been handled. Interactions spanning several events, such as a drag,
//! use [`CustomUndoApi::begin_long_lived_grouping`] to keep one group open
//! until the gesture ends.

mod action;
mod config;
mod facility;
mod manager;
pub mod stack_trace;
mod tracer;

pub use action::{HandlerAction, TargetId, UndoAction, UndoError, UndoHandler, UndoResult};
pub use config::{DEFAULT_INDENT, UndoConfig};
pub use facility::{Invocation, UndoFacility};
pub use manager::{DEFAULT_LEVELS_OF_UNDO, UndoManager};
pub use tracer::{CustomUndoApi, MISSING_NAME_WARNING, Step, TracingUndoManager};
