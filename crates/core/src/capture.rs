//! Capture buttons for key and mouse bindings.
//!
//! A capture button is an ordinary button while idle. Once activated it owns
//! all keyboard and mouse input until the next relevant press, which either
//! assigns a new binding or is reported as unrecognized. Either way the button
//! goes back to idle.

use wadlauncher_keymap::{key_display_name, mouse_button_display_name, UNASSIGNED_MOUSE_BUTTON};

/// Placeholder shown while a button waits for input.
pub const CAPTURE_PROMPT: &str = "[ Press a key or button... ]";

/// Which code space a binding lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSpace {
    /// IBM PC scan codes.
    Key,
    /// Mouse button index, `-1` for unassigned.
    Mouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
}

/// Input event routed to a capturing button, already translated by the GUI.
/// `None` means the toolkit reported a key or button with no mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureInput {
    Key(Option<u8>),
    Mouse(Option<i32>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Not relevant for this button; state unchanged.
    Ignored,
    /// New binding stored, capture finished.
    Assigned(i32),
    /// Capture finished without changing the binding.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureButton {
    space: CaptureSpace,
    value: i32,
    state: CaptureState,
}

impl CaptureButton {
    pub fn new(space: CaptureSpace, value: i32) -> Self {
        Self {
            space,
            value,
            state: CaptureState::Idle,
        }
    }

    /// Builds a button from a stored config value; non-integers become `-1`.
    pub fn from_stored(space: CaptureSpace, raw: &str) -> Self {
        let value = raw.trim().parse().unwrap_or(UNASSIGNED_MOUSE_BUTTON);
        Self::new(space, value)
    }

    pub fn space(&self) -> CaptureSpace {
        self.space
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    pub fn begin(&mut self) {
        self.state = CaptureState::Capturing;
    }

    pub fn cancel(&mut self) {
        self.state = CaptureState::Idle;
    }

    pub fn feed(&mut self, input: CaptureInput) -> CaptureOutcome {
        if !self.is_capturing() {
            return CaptureOutcome::Ignored;
        }
        let mapped = match (self.space, input) {
            (CaptureSpace::Key, CaptureInput::Key(code)) => code.map(i32::from),
            (CaptureSpace::Mouse, CaptureInput::Mouse(index)) => index,
            _ => return CaptureOutcome::Ignored,
        };
        self.state = CaptureState::Idle;
        match mapped {
            Some(value) => {
                self.value = value;
                CaptureOutcome::Assigned(value)
            }
            None => CaptureOutcome::Unrecognized,
        }
    }

    /// Text for the button face.
    pub fn label(&self) -> String {
        if self.is_capturing() {
            return CAPTURE_PROMPT.to_string();
        }
        match self.space {
            CaptureSpace::Key => key_display_name(self.value),
            CaptureSpace::Mouse => mouse_button_display_name(self.value),
        }
    }

    pub fn serialize(&self) -> String {
        self.value.to_string()
    }
}
