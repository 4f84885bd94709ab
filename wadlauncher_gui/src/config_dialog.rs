use eframe::egui;
use egui::{Modifiers, PointerButton, RichText};
use wadlauncher_core::{
    CaptureInput, CaptureOutcome, CaptureSpace, ConfigEditor, FieldValue,
};
use wadlauncher_keymap::{scan_code_for_char, scan_code_for_key, MouseButton};

use crate::notice::NoticeQueue;

const DIALOG_TITLE: &str = "Engine Configuration Editor";

/// Modal editor for the engine config file. Lives as long as the session is
/// open; the caller drops it once [`ConfigDialog::show`] returns `false`.
pub struct ConfigDialog {
    editor: ConfigEditor,
    modifiers_at_capture: Modifiers,
}

#[derive(Default)]
struct DialogActions {
    start_capture: Option<usize>,
    backup: bool,
    save: bool,
    cancel: bool,
}

impl ConfigDialog {
    pub fn new(editor: ConfigEditor) -> Self {
        Self {
            editor,
            modifiers_at_capture: Modifiers::NONE,
        }
    }

    /// Draws the dialog and applies user actions. Returns whether the dialog
    /// is still open.
    pub fn show(&mut self, ctx: &egui::Context, notices: &mut NoticeQueue) -> bool {
        if self.editor.form().active_capture().is_some() {
            self.poll_capture(ctx, notices);
        }
        let capturing = self.editor.form().active_capture().is_some();

        let mut open = true;
        let mut actions = DialogActions::default();
        egui::Window::new(DIALOG_TITLE)
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_size([500.0, 600.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(self.editor.path().display().to_string()).weak());
                ui.separator();
                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - 40.0)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add_enabled_ui(!capturing, |ui| {
                            self.render_fields(ui, &mut actions);
                        });
                    });
                ui.separator();
                ui.add_enabled_ui(!capturing, |ui| {
                    ui.horizontal(|ui| {
                        actions.backup = ui.button("Create Backup").clicked();
                        actions.save = ui.button("Save").clicked();
                        actions.cancel = ui.button("Cancel").clicked();
                    });
                });
            });

        if !open {
            actions.cancel = true;
        }
        self.apply(actions, ctx, notices)
    }

    fn render_fields(&mut self, ui: &mut egui::Ui, actions: &mut DialogActions) {
        egui::Grid::new("engine_config_form")
            .num_columns(2)
            .striped(true)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for (index, field) in self.editor.form_mut().fields_mut().iter_mut().enumerate() {
                    ui.label(field.key().to_string());
                    match &mut field.value {
                        FieldValue::Slider { value, max } => {
                            ui.add(egui::Slider::new(value, 0..=*max));
                        }
                        FieldValue::Checkbox(checked) => {
                            ui.checkbox(checked, "");
                        }
                        FieldValue::Capture(button) => {
                            if ui.button(button.label()).clicked() {
                                actions.start_capture = Some(index);
                            }
                        }
                        FieldValue::Text(text) => {
                            ui.text_edit_singleline(text);
                        }
                    }
                    ui.end_row();
                }
            });
    }

    fn apply(
        &mut self,
        actions: DialogActions,
        ctx: &egui::Context,
        notices: &mut NoticeQueue,
    ) -> bool {
        if let Some(index) = actions.start_capture {
            if self.editor.form_mut().begin_capture(index) {
                self.modifiers_at_capture = ctx.input(|i| i.modifiers);
            }
        }
        if actions.backup {
            match self.editor.backup() {
                Ok(path) => notices.info(
                    "Backup Created",
                    format!("A backup was created at:\n{}", path.display()),
                ),
                Err(err) => notices.error(
                    "Backup Error",
                    format!("Could not create the backup:\n{err}"),
                ),
            }
        }
        if actions.save {
            if let Err(err) = self.editor.save() {
                notices.error("Error", format!("Could not save the configuration:\n{err}"));
            }
        } else if actions.cancel {
            self.editor.cancel();
        }
        !self.editor.is_finished()
    }

    /// Feeds the first relevant press of this frame to the capturing field.
    fn poll_capture(&mut self, ctx: &egui::Context, notices: &mut NoticeQueue) {
        let Some(space) = self
            .editor
            .form()
            .active_capture()
            .and_then(|index| self.editor.form().fields()[index].capture())
            .map(|button| button.space())
        else {
            return;
        };

        let (events, modifiers) = ctx.input(|i| (i.events.clone(), i.modifiers));
        let mut input = capture_input_from_events(&events);
        if input.is_none() && space == CaptureSpace::Key {
            input = newly_pressed_modifier(self.modifiers_at_capture, modifiers)
                .map(|key_id| CaptureInput::Key(scan_code_for_key(key_id)));
        }
        self.modifiers_at_capture = modifiers;

        let Some(input) = input else {
            return;
        };
        if let Some((_, CaptureOutcome::Unrecognized)) = self.editor.form_mut().route_capture(input)
        {
            match space {
                CaptureSpace::Key => notices.warning(
                    "Unrecognized Key",
                    "The pressed key has no known IBM scan code.",
                ),
                CaptureSpace::Mouse => notices.warning(
                    "Unrecognized Button",
                    "Only the left, right and middle buttons are recognized.",
                ),
            }
        }
    }
}

/// Translates one frame of egui events into capture input. A mapped key or a
/// mouse button wins; keys egui only reports as text (`/`, `'`) come next; an
/// unmapped key press is reported last so the user gets a warning.
fn capture_input_from_events(events: &[egui::Event]) -> Option<CaptureInput> {
    let mut unmapped_key = false;
    for event in events {
        match event {
            egui::Event::Key {
                key, pressed: true, ..
            } => match scan_code_for_key(&format!("{key:?}")) {
                Some(code) => return Some(CaptureInput::Key(Some(code))),
                None => unmapped_key = true,
            },
            egui::Event::PointerButton {
                button,
                pressed: true,
                ..
            } => return Some(CaptureInput::Mouse(mouse_button_index(*button))),
            _ => {}
        }
    }
    let typed = events.iter().find_map(|event| match event {
        egui::Event::Text(text) => text.chars().next().and_then(scan_code_for_char),
        _ => None,
    });
    match typed {
        Some(code) => Some(CaptureInput::Key(Some(code))),
        None if unmapped_key => Some(CaptureInput::Key(None)),
        None => None,
    }
}

fn mouse_button_index(button: PointerButton) -> Option<i32> {
    let mapped = match button {
        PointerButton::Primary => MouseButton::Left,
        PointerButton::Secondary => MouseButton::Right,
        PointerButton::Middle => MouseButton::Middle,
        _ => return None,
    };
    mapped.is_capturable().then(|| mapped.index())
}

/// Modifiers never arrive as key events, so a modifier going down on its own
/// is detected from the modifier state.
fn newly_pressed_modifier(before: Modifiers, now: Modifiers) -> Option<&'static str> {
    if now.ctrl && !before.ctrl {
        Some("Control")
    } else if now.shift && !before.shift {
        Some("Shift")
    } else if now.alt && !before.alt {
        Some("Alt")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wadlauncher_keymap::{key_ids, MODIFIER_KEY_IDS};

    #[test]
    fn primary_buttons_map_to_engine_indices() {
        assert_eq!(mouse_button_index(PointerButton::Primary), Some(0));
        assert_eq!(mouse_button_index(PointerButton::Secondary), Some(1));
        assert_eq!(mouse_button_index(PointerButton::Middle), Some(2));
        assert_eq!(mouse_button_index(PointerButton::Extra1), None);
        assert_eq!(mouse_button_index(PointerButton::Extra2), None);
    }

    #[test]
    fn modifier_transitions_are_detected() {
        assert_eq!(
            newly_pressed_modifier(Modifiers::NONE, Modifiers::CTRL),
            Some("Control")
        );
        assert_eq!(
            newly_pressed_modifier(Modifiers::CTRL, Modifiers::CTRL),
            None
        );
        assert_eq!(
            newly_pressed_modifier(Modifiers::NONE, Modifiers::SHIFT),
            Some("Shift")
        );
        assert_eq!(
            newly_pressed_modifier(Modifiers::SHIFT, Modifiers::NONE),
            None
        );
        assert_eq!(
            scan_code_for_key(newly_pressed_modifier(Modifiers::NONE, Modifiers::ALT).unwrap()),
            Some(56)
        );
    }

    #[test]
    fn text_only_keys_are_captured_from_typed_text() {
        let events = [egui::Event::Text("/".to_string())];
        assert_eq!(
            capture_input_from_events(&events),
            Some(CaptureInput::Key(Some(53)))
        );
        let events = [egui::Event::Text("'".to_string())];
        assert_eq!(
            capture_input_from_events(&events),
            Some(CaptureInput::Key(Some(40)))
        );
        let events = [egui::Event::Text("a".to_string())];
        assert_eq!(capture_input_from_events(&events), None);
        assert_eq!(capture_input_from_events(&[]), None);
    }

    #[test]
    fn mouse_press_wins_over_typed_text() {
        let events = [
            egui::Event::Text("/".to_string()),
            egui::Event::PointerButton {
                pos: egui::Pos2::ZERO,
                button: PointerButton::Secondary,
                pressed: true,
                modifiers: Modifiers::NONE,
            },
        ];
        assert_eq!(
            capture_input_from_events(&events),
            Some(CaptureInput::Mouse(Some(1)))
        );
    }

    #[test]
    fn key_table_uses_real_egui_key_names() {
        let egui_names: Vec<String> = egui::Key::ALL.iter().map(|key| format!("{key:?}")).collect();
        for key_id in key_ids() {
            if MODIFIER_KEY_IDS.contains(&key_id) {
                continue;
            }
            assert!(
                egui_names.iter().any(|name| name == key_id),
                "{key_id} is not an egui::Key variant"
            );
        }
    }

    #[test]
    fn egui_key_names_resolve_to_scan_codes() {
        for (key, code) in [
            (egui::Key::A, 30),
            (egui::Key::Num1, 2),
            (egui::Key::Space, 57),
            (egui::Key::ArrowLeft, 75),
            (egui::Key::Escape, 1),
            (egui::Key::F12, 88),
        ] {
            assert_eq!(scan_code_for_key(&format!("{key:?}")), Some(code));
        }
    }
}
