//! Typed form fields for the engine config editor.
//!
//! Each config key is classified through [`CLASSIFICATION_RULES`], evaluated
//! top to bottom; the first matching rule decides the field type. Keys no rule
//! claims are edited as free text.

use crate::capture::{CaptureButton, CaptureInput, CaptureOutcome, CaptureSpace};
use crate::engine_config::{ConfigEntry, EngineConfig};

/// Keys starting with this prefix hold chat macros and are quoted on write.
pub const CHAT_MACRO_PREFIX: &str = "chatmacro";
/// Upper bound for volume sliders.
pub const VOLUME_MAX: u8 = 15;
/// Upper bound for every other slider.
pub const SLIDER_MAX: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Slider,
    Checkbox,
    KeyBinding,
    MouseBinding,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub enum KeyMatcher {
    OneOf(&'static [&'static str]),
    Prefix(&'static str),
}

impl KeyMatcher {
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyMatcher::OneOf(names) => names.contains(&key),
            KeyMatcher::Prefix(prefix) => key.starts_with(prefix),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub matcher: KeyMatcher,
    pub kind: FieldKind,
}

pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        matcher: KeyMatcher::OneOf(&[
            "sfx_volume",
            "music_volume",
            "mouse_sensitivity",
            "mouse_sensitivity_x2",
            "mouse_sensitivity_y",
        ]),
        kind: FieldKind::Slider,
    },
    ClassificationRule {
        matcher: KeyMatcher::OneOf(&["use_mouse", "show_messages", "use_joystick", "usegamma"]),
        kind: FieldKind::Checkbox,
    },
    ClassificationRule {
        matcher: KeyMatcher::Prefix("key_"),
        kind: FieldKind::KeyBinding,
    },
    ClassificationRule {
        matcher: KeyMatcher::Prefix("mouseb_"),
        kind: FieldKind::MouseBinding,
    },
];

pub fn classify(key: &str) -> FieldKind {
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matcher.matches(key))
        .map(|rule| rule.kind)
        .unwrap_or(FieldKind::Text)
}

pub fn slider_max(key: &str) -> u8 {
    if key.contains("volume") {
        VOLUME_MAX
    } else {
        SLIDER_MAX
    }
}

pub fn is_chat_macro(key: &str) -> bool {
    key.starts_with(CHAT_MACRO_PREFIX)
}

/// Quotes `text` so the shell-style reader returns it unchanged. Plain words
/// are written as is.
fn quote_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match shlex::try_quote(text) {
        Ok(quoted) => quoted.into_owned(),
        // Only interior NUL bytes are rejected; keep them inside double quotes.
        Err(_) => double_quote(text),
    }
}

/// Wraps `text` in double quotes, escaping `\` and `"`.
fn double_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Slider { value: u8, max: u8 },
    Checkbox(bool),
    Capture(CaptureButton),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    key: String,
    pub value: FieldValue,
}

impl FormField {
    pub fn from_entry(entry: &ConfigEntry) -> Self {
        let key = entry.key.clone();
        let raw = entry.value.as_str();
        let value = match classify(&key) {
            FieldKind::Slider => {
                let max = slider_max(&key);
                let value = raw
                    .trim()
                    .parse::<i64>()
                    .map(|parsed| parsed.clamp(0, i64::from(max)) as u8)
                    .unwrap_or(0);
                FieldValue::Slider { value, max }
            }
            FieldKind::Checkbox => FieldValue::Checkbox(raw == "1"),
            FieldKind::KeyBinding => {
                FieldValue::Capture(CaptureButton::from_stored(CaptureSpace::Key, raw))
            }
            FieldKind::MouseBinding => {
                FieldValue::Capture(CaptureButton::from_stored(CaptureSpace::Mouse, raw))
            }
            FieldKind::Text => FieldValue::Text(raw.to_string()),
        };
        Self { key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> FieldKind {
        classify(&self.key)
    }

    /// Value as written to the config file.
    pub fn serialize(&self) -> String {
        match &self.value {
            FieldValue::Slider { value, max } => (*value).min(*max).to_string(),
            FieldValue::Checkbox(checked) => String::from(if *checked { "1" } else { "0" }),
            FieldValue::Capture(button) => button.serialize(),
            FieldValue::Text(text) if is_chat_macro(&self.key) => double_quote(text),
            FieldValue::Text(text) => quote_text(text),
        }
    }

    pub fn to_entry(&self) -> ConfigEntry {
        ConfigEntry::new(self.key.clone(), self.serialize())
    }

    pub fn capture(&self) -> Option<&CaptureButton> {
        match &self.value {
            FieldValue::Capture(button) => Some(button),
            _ => None,
        }
    }

    pub fn capture_mut(&mut self) -> Option<&mut CaptureButton> {
        match &mut self.value {
            FieldValue::Capture(button) => Some(button),
            _ => None,
        }
    }
}

/// All editable fields of one config file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    fields: Vec<FormField>,
}

impl ConfigForm {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            fields: config.entries().iter().map(FormField::from_entry).collect(),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [FormField] {
        &mut self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|field| field.key == key)
    }

    pub fn to_entries(&self) -> Vec<ConfigEntry> {
        self.fields.iter().map(FormField::to_entry).collect()
    }

    /// Index of the field currently capturing input, if any.
    pub fn active_capture(&self) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.capture().is_some_and(CaptureButton::is_capturing))
    }

    /// Starts capturing on `index`; any other capture is cancelled so at most
    /// one field owns the input.
    pub fn begin_capture(&mut self, index: usize) -> bool {
        if self.fields.get(index).and_then(FormField::capture).is_none() {
            return false;
        }
        for (position, field) in self.fields.iter_mut().enumerate() {
            if let Some(button) = field.capture_mut() {
                if position == index {
                    button.begin();
                } else {
                    button.cancel();
                }
            }
        }
        true
    }

    pub fn cancel_capture(&mut self) {
        for field in &mut self.fields {
            if let Some(button) = field.capture_mut() {
                button.cancel();
            }
        }
    }

    /// Routes input to the capturing field. Returns `None` when nothing is
    /// capturing.
    pub fn route_capture(&mut self, input: CaptureInput) -> Option<(usize, CaptureOutcome)> {
        let index = self.active_capture()?;
        let button = self.fields[index].capture_mut()?;
        Some((index, button.feed(input)))
    }
}
