//! Scan-code tables for engine control bindings.
//! 引擎按鍵綁定使用的掃描碼對照表。
//!
//! Doom-engine config files store keyboard bindings as IBM PC set-1 scan codes
//! and mouse bindings as a small button index. The tables here translate both
//! spaces into display names, and translate the GUI toolkit's key identifiers
//! into scan codes when the user captures a new binding.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Mouse binding value meaning "no button assigned".
pub const UNASSIGNED_MOUSE_BUTTON: i32 = -1;

/// Pointer buttons the engine config can store.
/// 設定檔可記錄的滑鼠按鍵。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Button4,
}

impl MouseButton {
    pub const ALL: [MouseButton; 4] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Button4,
    ];

    /// Index written to the config file.
    pub fn index(self) -> i32 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Button4 => 3,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|button| button.index() == index)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MouseButton::Left => "Left Button",
            MouseButton::Right => "Right Button",
            MouseButton::Middle => "Middle Button",
            MouseButton::Button4 => "Button 4",
        }
    }

    /// Only the three primary buttons can be captured from the GUI.
    pub fn is_capturable(self) -> bool {
        !matches!(self, MouseButton::Button4)
    }
}

/// Scan code → display name (IBM PC set 1).
const SCAN_CODE_NAMES: &[(u8, &str)] = &[
    (1, "Escape"),
    (2, "1"),
    (3, "2"),
    (4, "3"),
    (5, "4"),
    (6, "5"),
    (7, "6"),
    (8, "7"),
    (9, "8"),
    (10, "9"),
    (11, "0"),
    (12, "-"),
    (13, "="),
    (14, "Backspace"),
    (15, "Tab"),
    (16, "Q"),
    (17, "W"),
    (18, "E"),
    (19, "R"),
    (20, "T"),
    (21, "Y"),
    (22, "U"),
    (23, "I"),
    (24, "O"),
    (25, "P"),
    (26, "["),
    (27, "]"),
    (28, "Enter"),
    (29, "Left Ctrl"),
    (30, "A"),
    (31, "S"),
    (32, "D"),
    (33, "F"),
    (34, "G"),
    (35, "H"),
    (36, "J"),
    (37, "K"),
    (38, "L"),
    (39, ";"),
    (40, "'"),
    (41, "`"),
    (42, "Left Shift"),
    (43, "\\"),
    (44, "Z"),
    (45, "X"),
    (46, "C"),
    (47, "V"),
    (48, "B"),
    (49, "N"),
    (50, "M"),
    (51, ","),
    (52, "."),
    (53, "/"),
    (54, "Right Shift"),
    (55, "* (Numpad)"),
    (56, "Left Alt"),
    (57, "Space"),
    (58, "Caps Lock"),
    (59, "F1"),
    (60, "F2"),
    (61, "F3"),
    (62, "F4"),
    (63, "F5"),
    (64, "F6"),
    (65, "F7"),
    (66, "F8"),
    (67, "F9"),
    (68, "F10"),
    (69, "Num Lock"),
    (70, "Scroll Lock"),
    (71, "7 (Numpad)"),
    (72, "Up"),
    (73, "9 (Numpad)"),
    (74, "- (Numpad)"),
    (75, "Left"),
    (76, "5 (Numpad)"),
    (77, "Right"),
    (78, "+ (Numpad)"),
    (79, "1 (Numpad)"),
    (80, "Down"),
    (81, "3 (Numpad)"),
    (82, "Insert"),
    (83, "Delete"),
    (87, "F11"),
    (88, "F12"),
];

/// Pseudo-keys the GUI reports when a modifier goes down on its own.
pub const MODIFIER_KEY_IDS: [&str; 3] = ["Control", "Shift", "Alt"];

/// Toolkit key identifier → scan code.
///
/// Identifiers are the egui `Key` variant names plus [`MODIFIER_KEY_IDS`].
const KEY_ID_SCAN_CODES: &[(&str, u8)] = &[
    ("Escape", 1),
    ("Num1", 2),
    ("Num2", 3),
    ("Num3", 4),
    ("Num4", 5),
    ("Num5", 6),
    ("Num6", 7),
    ("Num7", 8),
    ("Num8", 9),
    ("Num9", 10),
    ("Num0", 11),
    ("Minus", 12),
    ("Equals", 13),
    ("Backspace", 14),
    ("Tab", 15),
    ("Q", 16),
    ("W", 17),
    ("E", 18),
    ("R", 19),
    ("T", 20),
    ("Y", 21),
    ("U", 22),
    ("I", 23),
    ("O", 24),
    ("P", 25),
    ("OpenBracket", 26),
    ("CloseBracket", 27),
    ("Enter", 28),
    ("Control", 29),
    ("A", 30),
    ("S", 31),
    ("D", 32),
    ("F", 33),
    ("G", 34),
    ("H", 35),
    ("J", 36),
    ("K", 37),
    ("L", 38),
    ("Semicolon", 39),
    ("Backtick", 41),
    ("Shift", 42),
    ("Backslash", 43),
    ("Z", 44),
    ("X", 45),
    ("C", 46),
    ("V", 47),
    ("B", 48),
    ("N", 49),
    ("M", 50),
    ("Comma", 51),
    ("Period", 52),
    ("Alt", 56),
    ("Space", 57),
    ("F1", 59),
    ("F2", 60),
    ("F3", 61),
    ("F4", 62),
    ("F5", 63),
    ("F6", 64),
    ("F7", 65),
    ("F8", 66),
    ("F9", 67),
    ("F10", 68),
    ("ArrowUp", 72),
    ("ArrowLeft", 75),
    ("ArrowRight", 77),
    ("ArrowDown", 80),
    ("Insert", 82),
    ("Delete", 83),
    ("F11", 87),
    ("F12", 88),
];

/// Typed character → scan code, for keys the toolkit reports only as text.
const CHAR_SCAN_CODES: &[(char, u8)] = &[
    ('\'', 40),
    ('"', 40),
    ('/', 53),
    ('?', 53),
    ('*', 55),
];

static NAMES_BY_CODE: Lazy<HashMap<i32, &'static str>> = Lazy::new(|| {
    SCAN_CODE_NAMES
        .iter()
        .map(|&(code, name)| (i32::from(code), name))
        .collect()
});

static CODES_BY_KEY_ID: Lazy<HashMap<&'static str, u8>> =
    Lazy::new(|| KEY_ID_SCAN_CODES.iter().copied().collect());

/// Display name of a scan code, if the code is known.
/// 取得掃描碼的顯示名稱。
pub fn scan_code_name(code: i32) -> Option<&'static str> {
    NAMES_BY_CODE.get(&code).copied()
}

/// Display name of a scan code, rendering unknown codes as `Unknown (<code>)`.
pub fn key_display_name(code: i32) -> String {
    scan_code_name(code)
        .map(str::to_string)
        .unwrap_or_else(|| unknown(code))
}

/// Scan code for a toolkit key identifier such as `"A"` or `"ArrowUp"`.
/// 依工具組按鍵識別碼取得掃描碼。
pub fn scan_code_for_key(key_id: &str) -> Option<u8> {
    CODES_BY_KEY_ID.get(key_id).copied()
}

/// Scan code for a typed character with no key identifier of its own.
pub fn scan_code_for_char(ch: char) -> Option<u8> {
    CHAR_SCAN_CODES
        .iter()
        .find(|(mapped, _)| *mapped == ch)
        .map(|&(_, code)| code)
}

/// Every key identifier [`scan_code_for_key`] accepts.
pub fn key_ids() -> impl Iterator<Item = &'static str> {
    KEY_ID_SCAN_CODES.iter().map(|&(key_id, _)| key_id)
}

/// Display name of a mouse binding value.
pub fn mouse_button_display_name(index: i32) -> String {
    if index == UNASSIGNED_MOUSE_BUTTON {
        return "Unassigned".to_string();
    }
    MouseButton::from_index(index)
        .map(|button| button.display_name().to_string())
        .unwrap_or_else(|| unknown(index))
}

fn unknown(code: i32) -> String {
    format!("Unknown ({code})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_scan_codes_have_names() {
        assert_eq!(scan_code_name(1), Some("Escape"));
        assert_eq!(scan_code_name(57), Some("Space"));
        assert_eq!(key_display_name(29), "Left Ctrl");
        assert_eq!(key_display_name(88), "F12");
    }

    #[test]
    fn unmapped_code_renders_as_unknown() {
        assert_eq!(scan_code_name(999), None);
        assert_eq!(key_display_name(999), "Unknown (999)");
        assert_eq!(key_display_name(-1), "Unknown (-1)");
        assert_eq!(key_display_name(84), "Unknown (84)");
    }

    #[test]
    fn key_ids_translate_to_scan_codes() {
        assert_eq!(scan_code_for_key("W"), Some(17));
        assert_eq!(scan_code_for_key("Num0"), Some(11));
        assert_eq!(scan_code_for_key("ArrowUp"), Some(72));
        assert_eq!(scan_code_for_key("Control"), Some(29));
        assert_eq!(scan_code_for_key("Comma"), Some(51));
        assert_eq!(scan_code_for_key("F13"), None);
        assert_eq!(scan_code_for_key("Home"), None);
        assert_eq!(scan_code_for_key("Slash"), None);
    }

    #[test]
    fn typed_characters_translate_to_scan_codes() {
        assert_eq!(scan_code_for_char('/'), Some(53));
        assert_eq!(scan_code_for_char('\''), Some(40));
        assert_eq!(scan_code_for_char('*'), Some(55));
        assert_eq!(scan_code_for_char('a'), None);
        for (ch, code) in CHAR_SCAN_CODES {
            assert!(scan_code_name(i32::from(*code)).is_some(), "{ch:?}");
        }
    }

    #[test]
    fn modifier_ids_are_mapped() {
        for key_id in MODIFIER_KEY_IDS {
            assert!(key_ids().any(|id| id == key_id));
            assert!(scan_code_for_key(key_id).is_some());
        }
    }

    #[test]
    fn every_key_id_maps_to_a_named_code() {
        for (key_id, code) in KEY_ID_SCAN_CODES {
            assert!(
                scan_code_name(i32::from(*code)).is_some(),
                "{key_id} maps to unnamed code {code}"
            );
        }
    }

    #[test]
    fn mouse_buttons_render_names() {
        assert_eq!(mouse_button_display_name(0), "Left Button");
        assert_eq!(mouse_button_display_name(2), "Middle Button");
        assert_eq!(mouse_button_display_name(3), "Button 4");
        assert_eq!(mouse_button_display_name(UNASSIGNED_MOUSE_BUTTON), "Unassigned");
        assert_eq!(mouse_button_display_name(7), "Unknown (7)");
    }

    #[test]
    fn mouse_button_index_round_trips() {
        for button in MouseButton::ALL {
            assert_eq!(MouseButton::from_index(button.index()), Some(button));
        }
        assert!(MouseButton::Middle.is_capturable());
        assert!(!MouseButton::Button4.is_capturable());
    }
}
