#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::hit::Corner;
use crate::input::Gesture;

fn script(value: serde_json::Value) -> Script {
    Script::from_json(&value.to_string()).unwrap()
}

fn run(value: serde_json::Value) -> (Session, ReplayReport) {
    let mut session = Session::new(EditorConfig::default());
    let report = session.run(&script(value)).unwrap();
    (session, report)
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn empty_object_is_empty_script() {
    let s = script(json!({}));
    assert_eq!(s, Script::default());
}

#[test]
fn steps_parse_by_op() {
    let s = script(json!({
        "steps": [
            { "op": "add" },
            { "op": "pointer_down", "id": 1, "part": { "resize_handle": "sw" }, "x": 10, "y": 60 },
            { "op": "pointer_up" },
            { "op": "set_property", "property": "gap", "value": "8" },
            { "op": "list_drop", "index": 0 }
        ]
    }));
    assert_eq!(s.steps[0], Step::Add);
    assert_eq!(
        s.steps[1],
        Step::PointerDown { id: Some(1), part: Some(HitPart::ResizeHandle(Corner::Sw)), x: 10.0, y: 60.0 }
    );
    assert_eq!(s.steps[2], Step::PointerUp { x: 0.0, y: 0.0 });
    assert_eq!(s.steps[3], Step::SetProperty { property: LayoutProperty::Gap, value: "8".into() });
    assert_eq!(s.steps[4], Step::ListDrop { index: 0, payload: None });
}

#[test]
fn design_fields_sit_at_top_level() {
    let s = script(json!({
        "layout": { "mode": "grid", "gap": "4" },
        "elements": [{ "id": 3, "x": 1, "y": 2, "width": 30, "height": 40, "content": "A" }]
    }));
    assert_eq!(s.design.layout.mode, LayoutMode::Grid);
    assert_eq!(s.design.layout.gap, "4");
    assert_eq!(s.design.elements[0].width, 30.0);
}

#[test]
fn unknown_op_is_an_error() {
    let err = Script::from_json(r#"{"steps":[{"op":"teleport"}]}"#).unwrap_err();
    assert!(matches!(err, ScriptError::Json(_)));
}

// =============================================================
// Replay
// =============================================================

#[test]
fn replay_drag_through_document_pointer_up() {
    let (session, report) = run(json!({
        "steps": [
            { "op": "add" },
            { "op": "pointer_down", "id": 1, "x": 20, "y": 20 },
            { "op": "pointer_move", "x": 80, "y": 40 },
            { "op": "pointer_up", "x": 5000, "y": 5000 },
            { "op": "pointer_move", "x": 300, "y": 300 }
        ]
    }));
    let core = session.engine();
    let el = core.element(1).unwrap();
    assert_eq!((el.x, el.y), (70.0, 30.0));
    assert_eq!(*core.gesture(), Gesture::Idle);
    assert_eq!(report.steps, 5);
    assert_eq!(report.output_changes, 1);
    assert!(report.actions >= report.steps);
}

#[test]
fn replay_hit_tested_resize() {
    let (session, _) = run(json!({
        "steps": [
            { "op": "add" },
            { "op": "pointer_down", "x": 110, "y": 60 },
            { "op": "pointer_move", "x": 150, "y": 70 },
            { "op": "pointer_up" }
        ]
    }));
    let core = session.engine();
    let el = core.element(1).unwrap();
    assert_eq!((el.width, el.height), (140.0, 60.0));
}

#[test]
fn replay_with_viewport_offset() {
    let (session, _) = run(json!({
        "steps": [
            { "op": "viewport", "left": 100, "top": 50 },
            { "op": "add" },
            { "op": "pointer_down", "x": 140, "y": 90 },
            { "op": "pointer_move", "x": 240, "y": 90 },
            { "op": "pointer_up" }
        ]
    }));
    assert_eq!(session.engine().element(1).unwrap().x, 110.0);
}

#[test]
fn replay_edit_and_reorder() {
    let (session, _) = run(json!({
        "steps": [
            { "op": "add" },
            { "op": "add" },
            { "op": "double_click", "id": 2 },
            { "op": "edit_input", "text": "Footer" },
            { "op": "key_down", "key": "Enter" },
            { "op": "list_drag_start", "index": 1 },
            { "op": "list_drag_enter", "index": 0 },
            { "op": "list_drop", "index": 0 },
            { "op": "list_drag_end" }
        ]
    }));
    let core = session.engine();
    assert_eq!(core.elements()[0].content, "Footer");
    assert_eq!(core.elements()[1].id, 1);
}

#[test]
fn replay_layout_controls() {
    let (session, _) = run(json!({
        "elements": [{ "id": 1, "x": 10, "y": 10, "width": 100, "height": 50, "content": "A" }],
        "steps": [
            { "op": "set_mode", "mode": "flex" },
            { "op": "set_property", "property": "flex-direction", "value": "column" }
        ]
    }));
    let core = session.engine();
    assert!(core.output().contains(" display: flex;\n flex-direction: column;\n"));
    assert!(!core.output().contains("left:"));
}

#[test]
fn replay_remove_step() {
    let (session, _) = run(json!({
        "steps": [{ "op": "add" }, { "op": "add" }, { "op": "remove", "id": 1 }]
    }));
    assert_eq!(session.engine().elements().len(), 1);
    assert_eq!(session.engine().elements()[0].id, 2);
}

#[test]
fn part_without_id_is_rejected() {
    let mut session = Session::new(EditorConfig::default());
    let s = script(json!({
        "steps": [{ "op": "pointer_down", "part": "body", "x": 1, "y": 1 }]
    }));
    let err = session.run(&s).unwrap_err();
    assert!(matches!(err, ScriptError::PartWithoutId { step: 0 }));
}

#[test]
fn drag_start_on_missing_row_is_rejected() {
    let mut session = Session::new(EditorConfig::default());
    let s = script(json!({ "steps": [{ "op": "add" }, { "op": "list_drag_start", "index": 4 }] }));
    let err = session.run(&s).unwrap_err();
    assert!(matches!(err, ScriptError::NoSuchRow { step: 1, index: 4 }));
    assert_eq!(err.to_string(), "step 1: no order-list row at index 4");
}

#[test]
fn duplicate_ids_in_design_are_rejected() {
    let mut session = Session::new(EditorConfig::default());
    let s = script(json!({
        "elements": [
            { "id": 3, "x": 0, "y": 0, "width": 10, "height": 10, "content": "A" },
            { "id": 3, "x": 5, "y": 5, "width": 10, "height": 10, "content": "B" }
        ],
        "steps": [{ "op": "add" }]
    }));
    let err = session.run(&s).unwrap_err();
    assert!(matches!(err, ScriptError::Design(LoadError::DuplicateId(3))));
    assert_eq!(err.to_string(), "invalid design: duplicate element id 3");
    assert!(session.engine().elements().is_empty());
    assert_eq!(s.design.validate(), Err(LoadError::DuplicateId(3)));
}

#[test]
fn oversized_id_in_design_is_rejected() {
    let mut session = Session::new(EditorConfig::default());
    let s = Script::from_json(
        r#"{"elements":[{"id":18446744073709551615,"x":0,"y":0,"width":10,"height":10,"content":"A"}]}"#,
    )
    .unwrap();
    let err = session.run(&s).unwrap_err();
    assert!(matches!(err, ScriptError::Design(LoadError::IdOutOfRange { .. })));
}
