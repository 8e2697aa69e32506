//! `[undo]` configuration section.

use serde::Deserialize;

/// Default indent unit, repeated once per open group level.
pub const DEFAULT_INDENT: &str = "    ";

/// Settings for [`UndoManager`](crate::UndoManager) and
/// [`TracingUndoManager`](crate::TracingUndoManager).
///
/// ```toml
/// [undo]
/// enable_debug_logging = true
/// indent = "    "
/// levels_of_undo = 0
/// groups_by_event = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UndoConfig {
    /// Record trace steps. Turn off when performance matters.
    pub enable_debug_logging: bool,
    /// Indent unit of the rendered trace.
    pub indent: String,
    /// Maximum number of undo groups kept (0 = unlimited).
    pub levels_of_undo: usize,
    pub groups_by_event: bool,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            enable_debug_logging: true,
            indent: DEFAULT_INDENT.into(),
            levels_of_undo: 0,
            groups_by_event: true,
        }
    }
}
