use std::fs;

use tempfile::tempdir;
use wadlauncher_core::form::{SLIDER_MAX, VOLUME_MAX};
use wadlauncher_core::{
    CaptureInput, CaptureOutcome, ConfigEditor, EngineConfig, FieldKind, FieldValue,
    KEY_COLUMN_WIDTH,
};

const CRISPY_DEFAULT_CFG: &str = r#"mouse_sensitivity             5
sfx_volume                    8
music_volume                  25
show_messages                 1
key_right                     77
key_left                      75
key_up                        72
key_fire                      29
mouseb_fire                   0
mouseb_strafe                 1
mouseb_forward                -1
use_mouse                     1
screenblocks                  10
detaillevel                   0
usegamma                      0
chatmacro0                    "No"
chatmacro1                    "I'm ready to kick butt!"
"#;

#[test]
fn save_without_edits_keeps_keys_and_values() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("default.cfg");
    fs::write(&path, CRISPY_DEFAULT_CFG).expect("write cfg");

    let before = EngineConfig::load(&path).expect("load original");
    let mut editor = ConfigEditor::open(&path).expect("open editor");
    editor.save().expect("save");
    let after = EngineConfig::load(&path).expect("reload");

    let keys_before: Vec<_> = before.entries().iter().map(|e| e.key.as_str()).collect();
    let keys_after: Vec<_> = after.entries().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys_before, keys_after);

    for entry in before.entries() {
        let expected = if entry.key == "music_volume" {
            "15"
        } else {
            entry.value.as_str()
        };
        assert_eq!(after.get(&entry.key), Some(expected), "value of {}", entry.key);
    }
}

#[test]
fn written_lines_use_fixed_key_column() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("default.cfg");
    fs::write(&path, "key_up 72\nchatmacro0 \"Hi there\"\n").expect("write cfg");

    let mut editor = ConfigEditor::open(&path).expect("open editor");
    editor.save().expect("save");

    let text = fs::read_to_string(&path).expect("read back");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(&lines[0][..KEY_COLUMN_WIDTH], format!("{:<30}", "key_up"));
    assert_eq!(&lines[0][KEY_COLUMN_WIDTH..], "72");
    assert_eq!(&lines[1][KEY_COLUMN_WIDTH..], "\"Hi there\"");
    assert!(text.ends_with('\n'));
}

#[test]
fn sliders_and_checkboxes_stay_in_domain() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("default.cfg");
    fs::write(
        &path,
        "sfx_volume 99\nmouse_sensitivity_y -4\nuse_joystick true\nusegamma 1\n",
    )
    .expect("write cfg");

    let mut editor = ConfigEditor::open(&path).expect("open editor");
    for field in editor.form().fields() {
        match (&field.value, field.kind()) {
            (FieldValue::Slider { value, max }, FieldKind::Slider) => assert!(value <= max),
            (FieldValue::Checkbox(_), FieldKind::Checkbox) => {}
            other => panic!("unexpected field {other:?}"),
        }
    }
    editor.save().expect("save");

    let saved = EngineConfig::load(&path).expect("reload");
    assert_eq!(saved.get("sfx_volume"), Some(VOLUME_MAX.to_string().as_str()));
    assert_eq!(saved.get("mouse_sensitivity_y"), Some("0"));
    assert_eq!(saved.get("use_joystick"), Some("0"));
    assert_eq!(saved.get("usegamma"), Some("1"));
    assert!(SLIDER_MAX < VOLUME_MAX);
}

#[test]
fn captured_binding_is_written_back() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("default.cfg");
    fs::write(&path, CRISPY_DEFAULT_CFG).expect("write cfg");

    let mut editor = ConfigEditor::open(&path).expect("open editor");
    let index = editor
        .form()
        .fields()
        .iter()
        .position(|field| field.key() == "key_fire")
        .expect("key_fire present");
    assert!(editor.form_mut().begin_capture(index));
    assert_eq!(
        editor.form_mut().route_capture(CaptureInput::Key(Some(57))),
        Some((index, CaptureOutcome::Assigned(57)))
    );
    editor.save().expect("save");

    let saved = EngineConfig::load(&path).expect("reload");
    assert_eq!(saved.get("key_fire"), Some("57"));
}

#[test]
fn quotes_and_backslashes_survive_save() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("default.cfg");
    fs::write(
        &path,
        concat!(
            "key_up 72\n",
            "snd_name \"don't\"\n",
            "savedir \"C:\\\\DOOM\"\n",
            "chatmacro0 'say \"hi\" now'\n",
            "chatmacro1 \"back\\\\slash\"\n",
        ),
    )
    .expect("write cfg");

    let before = EngineConfig::load(&path).expect("load original");
    assert_eq!(before.get("snd_name"), Some("don't"));
    assert_eq!(before.get("savedir"), Some(r"C:\DOOM"));
    assert_eq!(before.get("chatmacro0"), Some(r#"say "hi" now"#));
    assert_eq!(before.get("chatmacro1"), Some(r"back\slash"));

    for _ in 0..2 {
        let mut editor = ConfigEditor::open(&path).expect("open editor");
        editor.save().expect("save");
        let after = EngineConfig::load(&path).expect("reload");
        assert_eq!(after, before);
    }

    let text = fs::read_to_string(&path).expect("read back");
    let chat_line = text
        .lines()
        .find(|line| line.starts_with("chatmacro0"))
        .expect("chatmacro0 line");
    assert_eq!(&chat_line[KEY_COLUMN_WIDTH..], r#""say \"hi\" now""#);
}
