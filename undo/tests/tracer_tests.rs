//! Behavioral tests for the tracing decorator.
//!
//! Run with:
//! ```bash
//! cargo test -p utilkit-undo --test tracer_tests
//! ```

mod common;

use rstest::rstest;

use common::{DOC, Document, LAYER, Move, SpyFacility};
use utilkit_undo::{
    CustomUndoApi, MISSING_NAME_WARNING, TracingUndoManager, UndoConfig, UndoFacility, UndoManager,
    function_name,
};

fn spy_tracer() -> TracingUndoManager<Document, SpyFacility> {
    TracingUndoManager::new(SpyFacility::default())
}

fn messages<T, F: UndoFacility<T>>(tracer: &TracingUndoManager<T, F>) -> Vec<String>
where
    T: 'static,
{
    tracer
        .debug_log()
        .iter()
        .map(|step| step.message.clone())
        .collect()
}

// ============================================================================
// Indentation
// ============================================================================

#[rstest]
#[case::top_level(0)]
#[case::one_group(1)]
#[case::three_groups(3)]
fn indent_tracks_open_group_depth(#[case] depth: usize) {
    let mut undo = TracingUndoManager::<Document>::new(UndoManager::new());
    for _ in 0..depth {
        undo.begin_undo_grouping();
    }
    undo.set_action_name("Probe");

    let step = undo.debug_log().last().unwrap();
    assert_eq!(step.indent, "    ".repeat(depth));
    // Each begin is recorded at the depth that existed before it.
    for (level, step) in undo.debug_log().iter().take(depth).enumerate() {
        assert_eq!(step.indent, "    ".repeat(level));
    }
}

#[test]
fn nested_groups_render_as_tree() {
    let mut undo = TracingUndoManager::<Document>::new(UndoManager::new());
    undo.begin_undo_grouping();
    undo.set_action_name("Outer");
    undo.begin_undo_grouping();
    undo.set_action_is_discardable(false);
    undo.end_undo_grouping().unwrap();
    undo.end_undo_grouping().unwrap();

    assert_eq!(
        undo.render_debug_log(),
        [
            "begin_undo_grouping",
            "    action_name = \"Outer\"",
            "    begin_undo_grouping",
            "        set_action_is_discardable(false)",
            "    end_undo_grouping",
            "end_undo_grouping",
        ]
        .join("\n")
    );
}

// ============================================================================
// Missing-name warning
// ============================================================================

#[test]
fn rename_scenario_has_no_warning() {
    let mut undo = spy_tracer();
    undo.begin_undo_grouping();
    undo.set_action_name("Rename");
    undo.end_undo_grouping().unwrap();

    assert_eq!(
        messages(&undo),
        ["begin_undo_grouping", "action_name = \"Rename\"", "end_undo_grouping"]
    );
}

#[test]
fn unnamed_scenario_has_exactly_one_warning() {
    let mut undo = spy_tracer();
    undo.begin_undo_grouping();
    undo.end_undo_grouping().unwrap();

    let messages = messages(&undo);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1], MISSING_NAME_WARNING);
    assert_eq!(messages[2], "end_undo_grouping");
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.as_str() == MISSING_NAME_WARNING)
            .count(),
        1
    );
}

// ============================================================================
// Long-lived grouping
// ============================================================================

#[test]
fn double_begin_long_lived_opens_one_group() {
    let mut undo = spy_tracer();
    undo.begin_long_lived_grouping();
    undo.begin_long_lived_grouping();

    assert_eq!(undo.inner().calls.begin, 1);
    assert_eq!(undo.inner().calls.set_groups_by_event, 1);
    assert_eq!(undo.grouping_level(), 1);
}

#[test]
fn end_long_lived_without_begin_touches_nothing() {
    let mut undo = spy_tracer();
    undo.end_long_lived_grouping().unwrap();

    assert_eq!(undo.inner().calls.end, 0);
    assert_eq!(undo.inner().calls.set_groups_by_event, 0);
    assert!(!undo.is_long_lived_group_open());
    assert!(undo.groups_by_event());
}

#[test]
fn long_lived_group_records_its_steps() {
    let mut undo = spy_tracer();
    undo.begin_long_lived_grouping();
    undo.set_action_name("Drag");
    undo.end_long_lived_grouping().unwrap();

    assert_eq!(
        messages(&undo),
        [
            "groups_by_event = false",
            "begin_undo_grouping",
            "action_name = \"Drag\"",
            "end_undo_grouping",
            "groups_by_event = true",
        ]
    );
}

#[test]
fn drag_spanning_events_undoes_as_one_step() {
    let mut undo = TracingUndoManager::<Document>::new(UndoManager::new());
    let mut doc = Document::default();

    // mouse down
    undo.begin_long_lived_grouping();
    undo.set_action_name("Drag");
    undo.end_event();

    // three mouse-dragged events
    for _ in 0..3 {
        doc.x += 2;
        undo.register_undo(DOC, Box::new(Move { dx: 2 })).unwrap();
        undo.end_event();
        assert_eq!(undo.grouping_level(), 1);
    }

    // mouse up
    undo.end_long_lived_grouping().unwrap();
    assert_eq!(undo.inner().undo_count(), 1);
    assert_eq!(undo.undo_action_name(), "Drag");

    undo.undo(&mut doc).unwrap();
    assert_eq!(doc.x, 0);
    undo.redo(&mut doc).unwrap();
    assert_eq!(doc.x, 6);
}

#[test]
fn event_grouping_splits_without_long_lived_group() {
    let mut undo = TracingUndoManager::<Document>::new(UndoManager::new());
    let mut doc = Document::default();

    for _ in 0..3 {
        doc.x += 1;
        undo.register_undo(DOC, Box::new(Move { dx: 1 })).unwrap();
        undo.end_event();
    }
    assert_eq!(undo.inner().undo_count(), 3);
}

// ============================================================================
// Enable flag
// ============================================================================

#[test]
fn disabled_tracing_keeps_log_empty_but_undo_working() {
    let mut undo = TracingUndoManager::<Document>::new(UndoManager::new());
    let mut doc = Document::default();
    undo.set_enable_debug_logging(false);

    undo.begin_undo_grouping();
    doc.x += 5;
    undo.register_undo(DOC, Box::new(Move { dx: 5 })).unwrap();
    undo.set_action_name("Move");
    undo.end_undo_grouping().unwrap();
    undo.begin_long_lived_grouping();
    undo.end_long_lived_grouping().unwrap();
    undo.undo(&mut doc).unwrap();

    assert!(undo.debug_log().is_empty());
    assert_eq!(doc.x, 0);

    undo.set_enable_debug_logging(true);
    undo.redo(&mut doc).unwrap();
    assert_eq!(messages(&undo), ["redo"]);
    assert_eq!(doc.x, 5);
}

#[test]
fn config_disables_tracing() {
    let config = UndoConfig {
        enable_debug_logging: false,
        ..UndoConfig::default()
    };
    let mut undo = TracingUndoManager::<Document>::from_config(&config);
    undo.remove_all_actions();
    assert!(!undo.enable_debug_logging());
    assert!(undo.debug_log().is_empty());
}

// ============================================================================
// Stack capture
// ============================================================================

// Registering code lives in out-of-line helpers so the expected caller frame
// survives inlining in release builds.

#[inline(never)]
fn move_document(undo: &mut TracingUndoManager<Document, SpyFacility>) {
    undo.register_undo(DOC, Box::new(Move { dx: 1 })).unwrap();
}

#[inline(never)]
fn rename_layer(undo: &mut TracingUndoManager<Document>, mut previous: String) {
    undo.prepare_invocation(LAYER)
        .handler(move |d: &mut Document| std::mem::swap(&mut d.name, &mut previous))
        .unwrap();
}

#[test]
fn register_undo_captures_caller_site() {
    let mut undo = spy_tracer();
    move_document(&mut undo);

    let step = &undo.debug_log()[0];
    assert_eq!(step.message, "register_undo");
    let trace = step.stack_trace.as_ref().unwrap();
    if trace.is_empty() {
        // Backtraces are unsupported on this target.
        return;
    }
    assert!(
        trace[0].contains("move_document"),
        "first frame should be the caller, got {}",
        trace[0]
    );
    assert_eq!(undo.inner().calls.register, 1);
}

#[test]
fn prepare_invocation_captures_caller_site() {
    let mut undo = TracingUndoManager::<Document>::new(UndoManager::new());
    let mut doc = Document {
        name: "Draft".into(),
        x: 0,
    };

    rename_layer(&mut undo, String::from("Untitled"));

    let step = &undo.debug_log()[0];
    assert_eq!(step.message, "prepare_invocation");
    let trace = step.stack_trace.as_ref().unwrap();
    if !trace.is_empty() {
        assert!(
            trace[0].contains("rename_layer"),
            "first frame should be the caller, got {}",
            trace[0]
        );
    }

    undo.undo(&mut doc).unwrap();
    assert_eq!(doc.name, "Untitled");
}

#[test]
fn register_undo_operation_uses_caller_name() {
    let mut undo = spy_tracer();
    let name = function_name!();
    undo.register_undo_operation(DOC, name, |d: &mut Document| d.x = -d.x)
        .unwrap();

    let step = &undo.debug_log()[0];
    assert!(step.message.starts_with("register_undo_operation() from "));
    assert!(step.message.ends_with("register_undo_operation_uses_caller_name"));
    assert!(step.stack_trace.is_some());
    assert_eq!(undo.inner().calls.register, 1);
}

#[test]
fn non_registering_steps_have_no_stack_trace() {
    let mut undo = spy_tracer();
    undo.begin_undo_grouping();
    undo.disable_undo_registration();
    undo.enable_undo_registration().unwrap();
    assert!(undo.debug_log().iter().all(|step| step.stack_trace.is_none()));
}

// ============================================================================
// Forwarding
// ============================================================================

#[test]
fn remaining_operations_record_their_names() {
    let mut undo = TracingUndoManager::<Document>::new(UndoManager::new());
    let mut doc = Document::default();

    undo.set_levels_of_undo(10);
    undo.disable_undo_registration();
    undo.enable_undo_registration().unwrap();
    undo.begin_undo_grouping();
    undo.begin_undo_grouping();
    doc.x += 1;
    undo.register_undo(DOC, Box::new(Move { dx: 1 })).unwrap();
    undo.set_action_name("Nudge");
    undo.end_undo_grouping().unwrap();
    undo.undo_nested_group(&mut doc).unwrap();
    undo.end_undo_grouping().unwrap();
    undo.remove_all_actions_with_target(LAYER);
    undo.remove_all_actions();

    assert_eq!(
        messages(&undo),
        [
            "levels_of_undo = 10",
            "disable_undo_registration",
            "enable_undo_registration",
            "begin_undo_grouping",
            "begin_undo_grouping",
            "register_undo",
            "action_name = \"Nudge\"",
            "end_undo_grouping",
            "undo_nested_group",
            "end_undo_grouping",
            "remove_all_actions_with_target(target#2)",
            "remove_all_actions",
        ]
    );
    assert_eq!(doc.x, 0);
}

#[test]
fn tracer_works_behind_trait_object() {
    let mut undo: Box<dyn UndoFacility<Document>> =
        Box::new(TracingUndoManager::<Document>::new(UndoManager::new()));
    let mut doc = Document::default();

    doc.x = 3;
    undo.register_undo(DOC, Box::new(Move { dx: 3 })).unwrap();
    undo.end_event();
    undo.undo(&mut doc).unwrap();
    assert_eq!(doc.x, 0);
    assert!(undo.can_redo());
}
