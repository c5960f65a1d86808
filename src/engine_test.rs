#![allow(clippy::float_cmp)]

use super::*;
use crate::config::ResizeClamp;
use crate::hit::Corner;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_output_changed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::OutputChanged))
}

fn geometry(core: &EngineCore, id: ElementId) -> (f64, f64, f64, f64) {
    let el = core.element(id).unwrap();
    (el.x, el.y, el.width, el.height)
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_core_is_empty_absolute() {
    let core = EngineCore::new();
    assert!(core.elements().is_empty());
    assert_eq!(core.layout().mode, LayoutMode::Absolute);
    assert!(core.gesture().is_idle());
    assert!(core.edit().is_none());
    assert!(!core.reorder_state().is_active());
}

#[test]
fn new_core_output_is_compiled() {
    let core = EngineCore::new();
    assert!(core.output().starts_with(".layout-container {\n position: relative;\n"));
}

#[test]
fn config_is_applied() {
    let config = EditorConfig {
        element_label: "Elemento".into(),
        container_height_px: 720.0,
        ..Default::default()
    };
    let mut core = EngineCore::with_config(config);
    let id = core.add_element();
    assert_eq!(core.element(id).unwrap().content, "Elemento 1");
    assert!(core.output().contains(" height: 720px;\n"));
    assert_eq!(core.config().container_height_px, 720.0);
}

// =============================================================
// Add / remove
// =============================================================

#[test]
fn add_n_elements_yields_increasing_ids() {
    let mut core = EngineCore::new();
    let ids: Vec<ElementId> = (0..6).map(|_| core.add_element()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(core.elements().iter().map(|e| e.id).collect::<Vec<_>>(), ids);
}

#[test]
fn add_recompiles_output() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    assert!(core.output().contains(&format!(".element-{id} {{")));
}

#[test]
fn remove_element_drops_it() {
    let mut core = EngineCore::new();
    let a = core.add_element();
    let b = core.add_element();
    let actions = core.remove_element(a);
    assert!(core.element(a).is_none());
    assert!(core.element(b).is_some());
    assert!(actions.contains(&Action::ElementRemoved { id: a }));
    assert!(has_output_changed(&actions));
    assert!(!core.output().contains(".element-1 "));
}

#[test]
fn remove_unknown_is_noop() {
    let mut core = EngineCore::new();
    core.add_element();
    let before = core.output().to_owned();
    assert!(core.remove_element(77).is_empty());
    assert_eq!(core.elements().len(), 1);
    assert_eq!(core.output(), before);
}

#[test]
fn remove_while_editing_clears_edit() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    core.on_double_click(id);
    let actions = core.remove_element(id);
    assert!(core.edit().is_none());
    assert!(actions.contains(&Action::EditEnded { id }));
}

#[test]
fn remove_other_element_keeps_edit() {
    let mut core = EngineCore::new();
    let a = core.add_element();
    let b = core.add_element();
    core.on_double_click(a);
    core.remove_element(b);
    assert_eq!(core.edit().map(|e| e.id), Some(a));
}

#[test]
fn remove_mid_drag_makes_moves_silent() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    core.on_pointer_down(id, HitPart::Body, pt(20.0, 20.0));
    core.remove_element(id);
    assert!(core.on_pointer_move(pt(200.0, 200.0)).is_empty());
    core.on_pointer_up();
    assert!(core.gesture().is_idle());
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_updates_geometry_and_output() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    core.on_pointer_down(id, HitPart::Body, pt(30.0, 20.0));
    let actions = core.on_pointer_move(pt(70.0, 90.0));
    assert_eq!(geometry(&core, id), (50.0, 80.0, 100.0, 50.0));
    assert!(has_output_changed(&actions));
    assert!(core.output().contains(" left: 50px;\n top: 80px;\n"));
    core.on_pointer_up();
    assert!(core.gesture().is_idle());
}

#[test]
fn drag_converts_screen_to_canvas() {
    let mut core = EngineCore::new();
    core.set_viewport(200.0, 100.0);
    let id = core.add_element();
    // Element top-left (10, 10) sits at screen (210, 110).
    core.on_pointer_down(id, HitPart::Body, pt(215.0, 115.0));
    assert_eq!(*core.gesture(), Gesture::Dragging { id, offset: pt(5.0, 5.0) });
    core.on_pointer_move(pt(305.0, 405.0));
    assert_eq!(geometry(&core, id), (100.0, 300.0, 100.0, 50.0));
    assert_eq!(core.viewport(), Viewport::new(200.0, 100.0));
}

#[test]
fn drag_in_flex_mode_still_moves_but_output_ignores_position() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    core.set_layout_mode(LayoutMode::Flex);
    let before = core.output().to_owned();
    core.on_pointer_down(id, HitPart::Body, pt(10.0, 10.0));
    let actions = core.on_pointer_move(pt(400.0, 400.0));
    assert_eq!(geometry(&core, id).0, 400.0);
    assert_eq!(core.output(), before);
    assert!(!has_output_changed(&actions));
}

// =============================================================
// Resize
// =============================================================

#[test]
fn resize_via_engine() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    let actions = core.on_pointer_down(id, HitPart::ResizeHandle(Corner::Se), pt(110.0, 60.0));
    assert_eq!(actions, vec![Action::SetCursor("nwse-resize".into())]);
    core.on_pointer_move(pt(140.0, 90.0));
    assert_eq!(geometry(&core, id), (10.0, 10.0, 130.0, 80.0));
    assert!(core.output().contains(" width: 130px;\n height: 80px;\n"));
}

#[test]
fn resize_floor_from_config() {
    let config = EditorConfig { min_size: 25.0, resize_clamp: ResizeClamp::PinEdge, ..Default::default() };
    let mut core = EngineCore::with_config(config);
    let id = core.add_element();
    core.on_pointer_down(id, HitPart::ResizeHandle(Corner::Nw), pt(10.0, 10.0));
    core.on_pointer_move(pt(500.0, 500.0));
    assert_eq!(geometry(&core, id), (85.0, 35.0, 25.0, 25.0));
}

// =============================================================
// Hit-tested pointer-down
// =============================================================

#[test]
fn pointer_down_at_classifies_body() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    core.on_pointer_down_at(pt(40.0, 40.0));
    assert_eq!(core.gesture().target(), Some(id));
    assert!(matches!(core.gesture(), Gesture::Dragging { .. }));
}

#[test]
fn pointer_down_at_classifies_handle() {
    let mut core = EngineCore::new();
    core.add_element();
    core.on_pointer_down_at(pt(110.0, 60.0));
    assert!(matches!(core.gesture(), Gesture::Resizing { corner: Corner::Se, .. }));
}

#[test]
fn pointer_down_at_button_starts_nothing() {
    let mut core = EngineCore::new();
    core.add_element();
    assert!(core.on_pointer_down_at(pt(95.0, 25.0)).is_empty());
    assert!(core.gesture().is_idle());
}

#[test]
fn pointer_down_at_miss_starts_nothing() {
    let mut core = EngineCore::new();
    core.add_element();
    assert!(core.on_pointer_down_at(pt(400.0, 400.0)).is_empty());
    assert!(core.gesture().is_idle());
}

// =============================================================
// Inline edit
// =============================================================

#[test]
fn edit_blur_commits() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    let actions = core.on_double_click(id);
    assert_eq!(actions, vec![Action::EditStarted { id, text: "Element 1".into() }]);
    assert!(core.on_edit_input("Sidebar"));
    let actions = core.on_edit_blur();
    assert_eq!(core.element(id).unwrap().content, "Sidebar");
    assert!(actions.contains(&Action::EditEnded { id }));
    assert!(core.edit().is_none());
}

#[test]
fn edit_enter_commits() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    core.on_double_click(id);
    core.on_edit_input("Nav");
    core.on_key_down(&Key("Enter".into()));
    assert_eq!(core.element(id).unwrap().content, "Nav");
}

#[test]
fn content_edit_does_not_change_output() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    let before = core.output().to_owned();
    core.on_double_click(id);
    core.on_edit_input("Renamed");
    let actions = core.on_edit_blur();
    assert_eq!(core.output(), before);
    assert!(!has_output_changed(&actions));
}

// =============================================================
// Layout controls
// =============================================================

#[test]
fn switching_mode_never_touches_geometry() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    core.on_pointer_down(id, HitPart::Body, pt(10.0, 10.0));
    core.on_pointer_move(pt(33.0, 44.0));
    core.on_pointer_up();
    let before = geometry(&core, id);
    for mode in [LayoutMode::Flex, LayoutMode::Grid, LayoutMode::Absolute] {
        core.set_layout_mode(mode);
        assert_eq!(geometry(&core, id), before);
    }
}

#[test]
fn set_mode_reports_layout_and_output() {
    let mut core = EngineCore::new();
    let actions = core.set_layout_mode(LayoutMode::Grid);
    assert!(has_action(&actions, |a| matches!(a, Action::LayoutChanged(c) if c.mode == LayoutMode::Grid)));
    assert!(has_output_changed(&actions));
    assert!(core.output().contains(" display: grid;\n"));
}

#[test]
fn set_same_mode_is_quiet() {
    let mut core = EngineCore::new();
    assert!(core.set_layout_mode(LayoutMode::Absolute).is_empty());
}

#[test]
fn leaving_flex_resets_through_engine() {
    let mut core = EngineCore::new();
    core.set_layout_mode(LayoutMode::Flex);
    core.set_layout_property(LayoutProperty::JustifyContent, "center");
    core.set_layout_mode(LayoutMode::Absolute);
    assert_eq!(core.layout().justify_content, "flex-start");
}

#[test]
fn inactive_property_change_keeps_output() {
    let mut core = EngineCore::new();
    let actions = core.set_layout_property(LayoutProperty::Gap, "20");
    assert!(has_action(&actions, |a| matches!(a, Action::LayoutChanged(_))));
    assert!(!has_output_changed(&actions));
}

#[test]
fn load_layout_recompiles() {
    let mut core = EngineCore::new();
    let mut layout = LayoutConfig::new();
    layout.set_mode(LayoutMode::Grid);
    layout.set(LayoutProperty::GridTemplateColumns, "repeat(3, 1fr)");
    core.load_layout(layout);
    assert!(core.output().contains(" grid-template-columns: repeat(3, 1fr);\n"));
}

// =============================================================
// Order list through the engine
// =============================================================

#[test]
fn reorder_changes_flow_output_order() {
    let mut core = EngineCore::new();
    core.add_element();
    core.add_element();
    core.add_element();
    core.set_layout_mode(LayoutMode::Flex);

    let payload = core.on_list_drag_start(0).unwrap();
    core.on_list_drag_enter(2);
    assert!(core.on_list_drag_over());
    assert!(core.row_state(1).dragging);
    assert!(core.row_state(3).hover);
    let actions = core.on_list_drop(2, &payload.data);
    core.on_list_drag_end();

    assert!(actions.contains(&Action::Reordered { id: 1, from: 0, to: 2 }));
    assert!(has_output_changed(&actions));
    let out = core.output();
    assert!(out.find(".element-2").unwrap() < out.find(".element-1").unwrap());
    assert!(!core.reorder_state().is_active());
}

#[test]
fn reorder_and_canvas_share_collection() {
    let mut core = EngineCore::new();
    let a = core.add_element();
    let b = core.add_element();

    core.on_pointer_down(b, HitPart::Body, pt(20.0, 20.0));
    core.on_pointer_move(pt(60.0, 20.0));
    core.on_pointer_up();

    core.on_list_drag_start(1);
    core.on_list_drop(0, "1");
    core.on_list_drag_end();

    assert_eq!(core.elements()[0].id, b);
    assert_eq!(core.elements()[0].x, 50.0);
    assert_eq!(core.elements()[1].id, a);
}

#[test]
fn snapshot_survives_later_events() {
    let mut core = EngineCore::new();
    let id = core.add_element();
    let snap = core.snapshot();
    core.on_pointer_down(id, HitPart::Body, pt(10.0, 10.0));
    core.on_pointer_move(pt(90.0, 90.0));
    assert_eq!(snap[0].x, 10.0);
    assert_eq!(core.element(id).unwrap().x, 90.0);
}

#[test]
fn load_elements_recompiles_and_continues_ids() {
    let mut core = EngineCore::new();
    core.load_elements(vec![Element { id: 9, x: 1.0, y: 2.0, width: 3.0, height: 4.0, content: "x".into() }])
        .unwrap();
    assert!(core.output().contains(".element-9 {"));
    assert_eq!(core.add_element(), 10);
}

#[test]
fn load_elements_with_duplicate_ids_keeps_document() {
    let mut core = EngineCore::new();
    core.add_element();
    let before = core.output().to_owned();
    let dup = Element { id: 3, x: 0.0, y: 0.0, width: 5.0, height: 5.0, content: "d".into() };
    let err = core.load_elements(vec![dup.clone(), dup]).unwrap_err();
    assert_eq!(err, LoadError::DuplicateId(3));
    assert_eq!(core.output(), before);
    assert_eq!(core.elements().len(), 1);
}

// =============================================================
// Scenarios
// =============================================================

#[test]
fn scenario_absolute_single_element() {
    let mut core = EngineCore::new();
    core.add_element();
    let out = core.output();
    assert!(out.contains(" position: relative;\n"));
    assert!(out.contains(" width: 100%;\n height: 500px;\n border: 1px solid #ccc;\n"));
    assert!(out.contains(" position: absolute;\n left: 10px;\n top: 10px;\n width: 100px;\n height: 50px;\n"));
}

#[test]
fn scenario_flex_column_single_element() {
    let mut core = EngineCore::new();
    core.add_element();
    core.set_layout_mode(LayoutMode::Flex);
    core.set_layout_property(LayoutProperty::FlexDirection, "column");
    let out = core.output();
    assert!(out.contains(" display: flex;\n flex-direction: column;\n"));
    assert!(!out.contains("left:"));
    assert!(!out.contains("top:"));
}

#[test]
fn action_changes_document_classification() {
    assert!(Action::ElementRemoved { id: 1 }.changes_document());
    assert!(Action::Reordered { id: 1, from: 0, to: 1 }.changes_document());
    assert!(!Action::RenderNeeded.changes_document());
    assert!(!Action::SetCursor("grab".into()).changes_document());
    assert!(!Action::EditEnded { id: 1 }.changes_document());
}
