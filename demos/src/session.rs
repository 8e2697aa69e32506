//! A scripted editing session against a small sketch document.
//!
//! Each function plays one user interaction through a
//! [`TracingUndoManager`], so the resulting trace shows what a real editor
//! would record.

use utilkit_core::math::{Rect, Vector2};
use utilkit_undo::{
    CustomUndoApi, TargetId, TracingUndoManager, UndoAction, UndoFacility, UndoResult,
    function_name,
};

pub const TITLE: TargetId = TargetId::new(1);
pub const FRAME: TargetId = TargetId::new(2);

/// The document edited by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    pub title: String,
    pub frame: Rect,
}

impl Default for Sketch {
    fn default() -> Self {
        Self {
            title: "Untitled".into(),
            frame: Rect::new(0.0, 0.0, 200.0, 100.0),
        }
    }
}

/// Moves the frame by `offset`.
#[derive(Debug)]
pub struct MoveFrame {
    pub offset: Vector2,
}

impl UndoAction<Sketch> for MoveFrame {
    fn undo(&mut self, sketch: &mut Sketch) -> UndoResult {
        sketch.frame.origin -= self.offset;
        Ok(())
    }

    fn redo(&mut self, sketch: &mut Sketch) -> UndoResult {
        sketch.frame.origin += self.offset;
        Ok(())
    }

    fn description(&self) -> &str {
        "Move frame"
    }
}

/// Renames the sketch as one explicitly grouped "Rename" step.
pub fn rename(
    undo: &mut TracingUndoManager<Sketch>,
    sketch: &mut Sketch,
    title: &str,
) -> UndoResult {
    undo.begin_undo_grouping();
    let mut previous = std::mem::replace(&mut sketch.title, title.to_owned());
    let registered = undo.register_undo_operation(TITLE, function_name!(), move |s: &mut Sketch| {
        std::mem::swap(&mut s.title, &mut previous)
    });
    undo.set_action_name("Rename");
    undo.end_undo_grouping()?;
    registered
}

/// Drags the frame through `offsets`, one input event per offset, keeping
/// the whole gesture in a single long-lived "Drag" group.
pub fn drag(
    undo: &mut TracingUndoManager<Sketch>,
    sketch: &mut Sketch,
    offsets: &[Vector2],
) -> UndoResult {
    // mouse down
    undo.begin_long_lived_grouping();
    undo.set_action_name("Drag");
    undo.end_event();

    let moved = offsets.iter().try_for_each(|offset| -> UndoResult {
        sketch.frame.origin += *offset;
        undo.register_undo(FRAME, Box::new(MoveFrame { offset: *offset }))?;
        undo.end_event();
        Ok(())
    });

    // mouse up
    undo.end_long_lived_grouping()?;
    moved
}

/// Scales the frame to fit `max_edge`, grouped by the current event.
pub fn fit(undo: &mut TracingUndoManager<Sketch>, sketch: &mut Sketch, max_edge: f64) -> UndoResult {
    let mut previous = sketch.frame.scale_to(max_edge);
    std::mem::swap(&mut sketch.frame, &mut previous);
    undo.prepare_invocation(FRAME)
        .handler(move |s: &mut Sketch| std::mem::swap(&mut s.frame, &mut previous))?;
    undo.set_action_name("Fit");
    undo.end_event();
    Ok(())
}

/// Runs rename, drag and fit, then undoes the fit.
pub fn run(undo: &mut TracingUndoManager<Sketch>) -> UndoResult<Sketch> {
    let mut sketch = Sketch::default();

    rename(undo, &mut sketch, "Floor plan")?;
    drag(
        undo,
        &mut sketch,
        &[
            Vector2::new(4.0, 0.0),
            Vector2::new(4.0, 2.0),
            Vector2::new(2.0, 2.0),
        ],
    )?;
    fit(undo, &mut sketch, 100.0)?;
    log::info!("Sketch after edits: {sketch:?}");

    undo.undo(&mut sketch)?;
    log::info!(
        "Undid fit; next undo is \"{}\", redo is \"{}\"",
        undo.undo_action_name(),
        undo.redo_action_name()
    );
    Ok(sketch)
}
