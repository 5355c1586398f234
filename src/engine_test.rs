#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::doc::TextKind;
use crate::mapping::TextAlign;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn ctrl_modifier() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn created_id(actions: &[Action]) -> ShapeId {
    actions
        .iter()
        .find_map(|a| match a {
            Action::ShapeCreated { id } => Some(id.clone()),
            _ => None,
        })
        .unwrap()
}

/// Core with a styled box at (10, 10), 200 x 50, holding `text`.
fn core_with_box(text: &str) -> (EngineCore, ShapeId) {
    let mut core = EngineCore::new();
    let id = core.doc.create_styled_text(pt(10.0, 10.0), &TextStyle::default());
    core.doc.set_text_content(&id, text);
    (core, id)
}

fn primitive_core() -> EngineCore {
    let mut config = EditorConfig::default();
    config.styled_text = false;
    config.default_style.size = 10.0;
    let mut core = EngineCore::with_config(config);
    core.set_tool(Tool::Text);
    core
}

const BOLD_BOX: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:se="http://svg-edit.googlecode.com"><g class="layer"><foreignObject se:type="text" id="t1" x="0" y="0" width="100" height="40"><div xmlns="http://www.w3.org/1999/xhtml" style="font-weight: bold;">Hi</div></foreignObject></g></svg>"#;

// =============================================================
// Defaults
// =============================================================

#[test]
fn core_new_is_idle() {
    let core = EngineCore::new();
    assert_eq!(core.mode(), Mode::Select);
    assert!(core.selection().is_none());
    assert!(core.editing().is_none());
    assert_eq!(core.ui.tool, Tool::Select);
    assert!(core.overlay().is_empty());
}

#[test]
fn set_tool_reports_cursor() {
    let mut core = EngineCore::new();
    assert_eq!(core.set_tool(Tool::Text), vec![Action::SetCursor { cursor: "text".into() }]);
    assert_eq!(core.set_tool(Tool::Select), vec![Action::SetCursor { cursor: "default".into() }]);
}

#[test]
fn set_zoom_ignores_non_positive() {
    let mut core = EngineCore::new();
    core.set_zoom(2.0);
    core.set_zoom(0.0);
    core.set_zoom(-1.0);
    assert_eq!(core.viewport.zoom, 2.0);
}

// =============================================================
// Text tool
// =============================================================

#[test]
fn text_tool_creates_styled_box_and_edits_it() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    let actions = core.on_pointer_down(pt(50.0, 60.0), Button::Primary, 0.0);
    let id = created_id(&actions);

    assert_eq!(actions[0], Action::ShapeCreated { id: id.clone() });
    assert!(actions.contains(&Action::FocusTextBox { id: id.clone(), select_all: true }));
    assert!(actions.contains(&Action::AttachListeners { id: id.clone() }));
    assert_eq!(core.mode(), Mode::TextEdit);
    assert_eq!(core.editing(), Some(id.as_str()));
    assert_eq!(core.doc.kind(&id), Some(TextKind::StyledBox));
    assert_eq!(core.doc.shape(&id).unwrap().attribute("x"), Some("50"));
}

#[test]
fn text_tool_places_shape_in_user_space() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    core.set_zoom(2.0);
    let id = created_id(&core.on_pointer_down(pt(100.0, 120.0), Button::Primary, 0.0));
    let shape = core.doc.shape(&id).unwrap();
    assert_eq!(shape.attribute("x"), Some("50"));
    assert_eq!(shape.attribute("y"), Some("60"));
}

#[test]
fn new_text_takes_configured_style() {
    let mut config = EditorConfig::default();
    config.default_style.align = TextAlign::Center;
    config.default_style.size = 30.0;
    let mut core = EngineCore::with_config(config);
    core.set_tool(Tool::Text);
    let id = created_id(&core.on_pointer_down(pt(0.0, 0.0), Button::Primary, 0.0));
    let style = core.text_style(&id).unwrap();
    assert_eq!(style.align, TextAlign::Center);
    assert_eq!(style.size, 30.0);
}

#[test]
fn text_tool_creates_primitive_when_configured() {
    let mut core = primitive_core();
    let actions = core.on_pointer_down(pt(0.0, 20.0), Button::Primary, 0.0);
    let id = created_id(&actions);
    assert_eq!(core.doc.kind(&id), Some(TextKind::Primitive));
    assert!(actions.contains(&Action::FocusInput));
    assert!(actions.contains(&Action::StartBlink { interval_ms: 600.0 }));
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    assert!(core.on_pointer_down(pt(0.0, 0.0), Button::Secondary, 0.0).is_empty());
    assert!(core.doc.text_shape_ids().is_empty());
}

#[test]
fn unused_new_text_is_deleted_when_clicking_elsewhere() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    let first = created_id(&core.on_pointer_down(pt(10.0, 10.0), Button::Primary, 0.0));
    let actions = core.on_pointer_down(pt(300.0, 300.0), Button::Primary, 100.0);
    let second = created_id(&actions);

    assert!(actions.contains(&Action::ShapeDeleted { id: first.clone() }));
    assert!(core.doc.shape(&first).is_none());
    assert_eq!(core.editing(), Some(second.as_str()));
}

#[test]
fn press_inside_edited_box_is_left_to_host() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    let id = created_id(&core.on_pointer_down(pt(10.0, 10.0), Button::Primary, 0.0));
    assert!(core.on_pointer_down(pt(20.0, 20.0), Button::Primary, 50.0).is_empty());
    assert_eq!(core.editing(), Some(id.as_str()));
}

// =============================================================
// Rich-text callbacks
// =============================================================

#[test]
fn typing_syncs_content_and_blur_reselects() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    let id = created_id(&core.on_pointer_down(pt(10.0, 10.0), Button::Primary, 0.0));

    assert_eq!(core.on_text_input("Hello", 5, 5), vec![Action::Changed { id: id.clone() }]);
    assert_eq!(core.doc.text_content(&id).unwrap(), "Hello");

    let actions = core.on_blur();
    assert!(actions.contains(&Action::DetachListeners { id: id.clone() }));
    assert!(actions.contains(&Action::Selected { id: id.clone() }));
    assert_eq!(core.mode(), Mode::Select);
    assert_eq!(core.selection(), Some(id.as_str()));
}

#[test]
fn escape_leaves_edit_mode_and_selects() {
    let (mut core, id) = core_with_box("Hi");
    core.begin_edit(&id, None, 0.0);
    let actions = core.on_key_down(Key("Escape".into()), no_modifiers(), 10.0);
    assert!(actions.contains(&Action::BlurTextBox { id: id.clone() }));
    assert_eq!(core.selection(), Some(id.as_str()));
}

#[test]
fn enter_while_editing_inserts_soft_break() {
    let (mut core, id) = core_with_box("Hi");
    core.begin_edit(&id, None, 0.0);
    let actions = core.on_key_down(Key("Enter".into()), no_modifiers(), 10.0);
    assert_eq!(actions, vec![Action::InsertSoftBreak { id: id.clone() }, Action::Changed { id }]);
}

#[test]
fn typed_line_breaks_are_exported_as_br() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    let id = created_id(&core.on_pointer_down(pt(10.0, 10.0), Button::Primary, 0.0));
    core.on_key_down(Key("Enter".into()), no_modifiers(), 5.0);
    core.on_text_input("one\ntwo", 7, 7);
    core.on_blur();

    let markup = core.export().unwrap();
    assert!(markup.contains("one<br/>two"));
    assert!(core.load(&markup));
    assert_eq!(core.doc.text_content(&id).unwrap(), "one\ntwo");
}

// =============================================================
// Select tool
// =============================================================

#[test]
fn click_selects_and_clears() {
    let (mut core, id) = core_with_box("Hi");
    let actions = core.on_pointer_down(pt(20.0, 20.0), Button::Primary, 0.0);
    assert!(actions.contains(&Action::Selected { id: id.clone() }));
    assert_eq!(core.selection(), Some(id.as_str()));

    let actions = core.on_pointer_down(pt(500.0, 500.0), Button::Primary, 10.0);
    assert!(actions.contains(&Action::SelectionCleared));
    assert!(core.selection().is_none());
}

#[test]
fn double_click_edits_text_shape() {
    let (mut core, id) = core_with_box("Hi");
    let actions = core.on_double_click(pt(20.0, 20.0), 0.0);
    assert!(actions.contains(&Action::FocusTextBox { id: id.clone(), select_all: true }));
    assert_eq!(core.editing(), Some(id.as_str()));
}

#[test]
fn double_click_on_empty_space_does_nothing() {
    let (mut core, _) = core_with_box("Hi");
    assert!(core.on_double_click(pt(500.0, 500.0), 0.0).is_empty());
    assert_eq!(core.mode(), Mode::Select);
}

#[test]
fn enter_edits_selected_shape() {
    let (mut core, id) = core_with_box("Hi");
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary, 0.0);
    let actions = core.on_key_down(Key("Enter".into()), no_modifiers(), 10.0);
    assert!(actions.contains(&Action::AttachListeners { id: id.clone() }));
    assert_eq!(core.editing(), Some(id.as_str()));
}

#[test]
fn delete_removes_selected_shape() {
    let (mut core, id) = core_with_box("Hi");
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary, 0.0);
    let actions = core.on_key_down(Key("Delete".into()), no_modifiers(), 10.0);
    assert!(actions.contains(&Action::ShapeDeleted { id: id.clone() }));
    assert!(core.doc.shape(&id).is_none());
    assert!(core.selection().is_none());
}

#[test]
fn keys_without_selection_do_nothing() {
    let (mut core, _) = core_with_box("Hi");
    assert!(core.on_key_down(Key("Delete".into()), no_modifiers(), 0.0).is_empty());
}

// =============================================================
// Style commands
// =============================================================

#[test]
fn style_command_applies_to_selection() {
    let (mut core, id) = core_with_box("Hi");
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary, 0.0);
    let actions = core.apply_style_command(&StyleCommand::ToggleBold);
    assert_eq!(actions, vec![Action::Changed { id: id.clone() }, Action::RenderNeeded]);
    assert_eq!(core.text_style(&id).unwrap().weight, "bold");
}

#[test]
fn style_command_without_target_does_nothing() {
    let (mut core, _) = core_with_box("Hi");
    assert!(core.apply_style_command(&StyleCommand::ToggleBold).is_empty());
}

#[test]
fn shortcut_styles_shape_being_edited() {
    let (mut core, id) = core_with_box("Hi");
    core.begin_edit(&id, None, 0.0);
    let actions = core.on_key_down(Key("b".into()), ctrl_modifier(), 10.0);
    assert!(actions.contains(&Action::Changed { id: id.clone() }));
    assert_eq!(core.current_text_style().unwrap().weight, "bold");

    core.on_key_down(Key("U".into()), Modifiers { meta: true, ..Default::default() }, 20.0);
    assert_eq!(core.current_text_style().unwrap().decoration, "underline");
    assert_eq!(core.mode(), Mode::TextEdit);
}

#[test]
fn current_style_follows_selection() {
    let (mut core, _) = core_with_box("Hi");
    assert!(core.current_text_style().is_none());
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary, 0.0);
    assert_eq!(core.current_text_style().unwrap().align, TextAlign::Left);
}

// =============================================================
// Deletion and clearing
// =============================================================

#[test]
fn deleting_edited_shape_ends_session_first() {
    let (mut core, id) = core_with_box("Hi");
    core.begin_edit(&id, None, 0.0);
    let actions = core.apply_delete(&id);

    let detach = actions.iter().position(|a| *a == Action::DetachListeners { id: id.clone() }).unwrap();
    let deleted = actions.iter().position(|a| *a == Action::ShapeDeleted { id: id.clone() }).unwrap();
    assert!(detach < deleted);
    assert_eq!(core.mode(), Mode::Select);
    assert!(core.doc.shape(&id).is_none());
}

#[test]
fn delete_of_missing_shape_is_quiet() {
    let mut core = EngineCore::new();
    assert!(core.apply_delete("nope").is_empty());
}

#[test]
fn clear_ends_session() {
    let (mut core, id) = core_with_box("Hi");
    core.begin_edit(&id, None, 0.0);
    let actions = core.clear();
    assert!(actions.contains(&Action::DetachListeners { id }));
    assert_eq!(core.mode(), Mode::Select);
}

#[test]
fn switching_tools_ends_session() {
    let (mut core, id) = core_with_box("Hi");
    core.begin_edit(&id, None, 0.0);
    let actions = core.set_tool(Tool::Select);
    assert!(actions.contains(&Action::DetachListeners { id }));
    assert_eq!(core.mode(), Mode::Select);
}

// =============================================================
// Load / export
// =============================================================

#[test]
fn load_replaces_document() {
    let mut core = EngineCore::new();
    assert!(core.load(BOLD_BOX));
    assert_eq!(core.doc.text_shape_ids(), vec!["t1".to_owned()]);
    assert_eq!(core.text_style("t1").unwrap().weight, "bold");
    let drained = core.drain_actions();
    assert!(drained.contains(&Action::SelectionCleared));
    assert!(core.drain_actions().is_empty());
}

#[test]
fn failed_load_keeps_document() {
    let (mut core, id) = core_with_box("Hi");
    let before = core.export().unwrap();
    assert!(!core.load("<svg><g></svg>"));
    assert!(!core.load("<html/>"));
    assert_eq!(core.export().unwrap(), before);
    assert!(core.doc.shape(&id).is_some());
    assert!(core.drain_actions().is_empty());
}

#[test]
fn load_while_editing_ends_session() {
    let (mut core, id) = core_with_box("Hi");
    core.begin_edit(&id, None, 0.0);
    assert!(core.load(BOLD_BOX));
    assert_eq!(core.mode(), Mode::Select);
    assert!(core.drain_actions().contains(&Action::DetachListeners { id }));
}

#[test]
fn export_round_trips_through_load() {
    let (mut core, id) = core_with_box("Hi");
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary, 0.0);
    core.apply_style_command(&StyleCommand::SetAnchor(crate::mapping::TextAnchor::End));
    let markup = core.export().unwrap();

    let mut other = EngineCore::new();
    assert!(other.load(&markup));
    assert_eq!(other.text_style(&id).unwrap().align, TextAlign::Right);
}

// =============================================================
// Primitive text
// =============================================================

#[test]
fn primitive_typing_moves_caret_and_blinks() {
    let mut core = primitive_core();
    let id = created_id(&core.on_pointer_down(pt(0.0, 20.0), Button::Primary, 0.0));

    let actions = core.on_text_input("hello", 5, 5);
    assert_eq!(actions[0], Action::Changed { id });
    assert_eq!(core.controller().caret().cells().len(), 6);
    assert!(core.overlay().caret.unwrap().visible);

    assert_eq!(core.blink(600.0), vec![Action::RenderNeeded]);
    assert!(!core.overlay().caret.unwrap().visible);
}

#[test]
fn primitive_drag_selects() {
    let mut core = primitive_core();
    created_id(&core.on_pointer_down(pt(0.0, 20.0), Button::Primary, 0.0));
    core.on_text_input("hello", 5, 5);

    core.on_pointer_down(pt(1.0, 15.0), Button::Primary, 100.0);
    core.on_pointer_move(pt(20.0, 15.0), 110.0);
    let actions = core.on_pointer_up(pt(20.0, 15.0), Button::Primary, 120.0);
    assert!(actions.contains(&Action::SetInputSelection { start: 0, end: 3 }));
    assert!(core.overlay().selection.is_some());
}

#[test]
fn click_off_primitive_ends_session_and_blink() {
    let mut core = primitive_core();
    let id = created_id(&core.on_pointer_down(pt(0.0, 20.0), Button::Primary, 0.0));
    core.on_text_input("hello", 5, 5);

    core.on_pointer_down(pt(200.0, 100.0), Button::Primary, 100.0);
    let actions = core.on_pointer_up(pt(200.0, 100.0), Button::Primary, 110.0);
    assert!(actions.contains(&Action::StopBlink));
    assert!(actions.contains(&Action::Selected { id: id.clone() }));
    assert_eq!(core.mode(), Mode::Select);
    assert_eq!(core.selection(), Some(id.as_str()));
    assert!(core.blink(5000.0).is_empty());
    assert!(core.overlay().is_empty());
}

#[test]
fn selection_follows_reported_actions_in_every_handler() {
    fn replay(mirror: &mut Option<ShapeId>, actions: &[Action]) {
        for action in actions {
            match action {
                Action::Selected { id } => *mirror = Some(id.clone()),
                Action::SelectionCleared => *mirror = None,
                Action::ShapeDeleted { id } if mirror.as_ref() == Some(id) => *mirror = None,
                _ => {}
            }
        }
    }

    let mut core = primitive_core();
    let mut mirror = None;
    let steps: [fn(&mut EngineCore) -> Vec<Action>; 9] = [
        |core| core.on_pointer_down(pt(0.0, 20.0), Button::Primary, 0.0),
        |core| core.on_text_input("hello", 5, 5),
        |core| core.blink(600.0),
        |core| core.on_pointer_down(pt(1.0, 15.0), Button::Primary, 700.0),
        |core| core.on_pointer_move(pt(20.0, 15.0), 710.0),
        |core| core.on_pointer_up(pt(20.0, 15.0), Button::Primary, 715.0),
        |core| core.on_double_click(pt(5.0, 15.0), 720.0),
        |core| core.on_pointer_down(pt(200.0, 100.0), Button::Primary, 900.0),
        |core| core.on_pointer_up(pt(200.0, 100.0), Button::Primary, 910.0),
    ];
    for (i, step) in steps.iter().enumerate() {
        let actions = step(&mut core);
        replay(&mut mirror, &actions);
        assert_eq!(core.selection(), mirror.as_deref(), "step {i}");
    }
    assert!(mirror.is_some());
}

// =============================================================
// Action serialization
// =============================================================

#[test]
fn actions_serialize_as_tagged_json() {
    let focus = Action::FocusTextBox { id: "svg_1".into(), select_all: true };
    assert_eq!(
        serde_json::to_value(&focus).unwrap(),
        json!({ "type": "focus_text_box", "id": "svg_1", "select_all": true })
    );
    assert_eq!(
        serde_json::to_value(Action::ModeChanged { mode: Mode::TextEdit }).unwrap(),
        json!({ "type": "mode_changed", "mode": "text_edit" })
    );
    assert_eq!(serde_json::to_value(Action::RenderNeeded).unwrap(), json!({ "type": "render_needed" }));
}

#[test]
fn actions_deserialize_from_host_json() {
    let action: Action = serde_json::from_value(json!({ "type": "start_blink", "interval_ms": 250.0 })).unwrap();
    assert_eq!(action, Action::StartBlink { interval_ms: 250.0 });
}
