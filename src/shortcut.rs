use winit::event::VirtualKeyCode;

/// A normalized key press as seen by the dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct KeyPress {
    pub ctrl: bool,
    pub key: VirtualKeyCode,
    pub meta: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn bare(key: VirtualKeyCode) -> Self {
        Self {
            ctrl: false,
            key,
            meta: false,
            shift: false,
        }
    }

    /// Ctrl on most platforms, the command key on macOS.
    fn chorded(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What a key press resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutAction {
    CloseOverlays,
    ToggleCommandPalette,
    ToggleRain,
    ToggleSettings,
}

/// The hidden sequence. Completing it toggles the rain.
pub const GESTURE: [VirtualKeyCode; 10] = [
    VirtualKeyCode::Up,
    VirtualKeyCode::Up,
    VirtualKeyCode::Down,
    VirtualKeyCode::Down,
    VirtualKeyCode::Left,
    VirtualKeyCode::Right,
    VirtualKeyCode::Left,
    VirtualKeyCode::Right,
    VirtualKeyCode::B,
    VirtualKeyCode::A,
];

/// Translates raw key presses into [`ShortcutAction`]s.
///
/// Composite chords (mod+K, mod+Comma) and Escape are recognized
/// immediately and never touch the gesture progress. Everything else is
/// matched against [`GESTURE`]: a match advances, a mismatch resets
/// progress to zero. The mismatching key is deliberately not re-evaluated
/// against the start of the sequence, so a wrong key always costs the whole
/// attempt, even when it happens to be the sequence's first key.
///
/// While a text widget owns the keyboard (`typing`), bare keys are ignored
/// entirely; chords and Escape still fire, which is what lets mod+K close
/// the palette while its query field has focus.
pub struct ShortcutDispatcher {
    progress: usize,
}

impl ShortcutDispatcher {
    pub fn new() -> Self {
        Self { progress: 0 }
    }

    /// Position in the gesture, always in `0..GESTURE.len()`.
    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn handle(&mut self, press: KeyPress, typing: bool) -> Option<ShortcutAction> {
        if press.chorded() {
            let action = match press.key {
                VirtualKeyCode::K => Some(ShortcutAction::ToggleCommandPalette),
                VirtualKeyCode::Comma => Some(ShortcutAction::ToggleSettings),
                _ => None,
            };

            if action.is_none() && !typing {
                // An unrelated chord mid-sequence is still a wrong input.
                self.progress = 0;
            }

            return action;
        }

        if press.key == VirtualKeyCode::Escape {
            return Some(ShortcutAction::CloseOverlays);
        }

        if typing {
            return None;
        }

        if press.key == GESTURE[self.progress] {
            self.progress += 1;

            if self.progress == GESTURE.len() {
                self.progress = 0;
                return Some(ShortcutAction::ToggleRain);
            }
        } else {
            self.progress = 0;
        }

        None
    }
}
