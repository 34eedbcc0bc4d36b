//! Frame-coherent keyboard state.
//!
//! Keys are tracked by [`KeyCode`] (physical position) so WASD works the
//! same on every layout. Keys winit cannot identify are dropped.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Platform-independent key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: KeyCode,
    pub state: ElementState,
    /// OS auto-repeat; ignored.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// Converts a winit event, or `None` for unidentified keys.
    pub fn from_winit(event: &KeyEvent) -> Option<Self> {
        match event.physical_key {
            PhysicalKey::Code(key) => Some(Self {
                key,
                state: event.state,
                repeat: event.repeat,
            }),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

/// Held, just-pressed and just-released keys for the current frame.
///
/// Feed events with [`process_event`](Self::process_event), query during the
/// frame update, then call [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    pressed_this_frame: HashSet<KeyCode>,
    released_this_frame: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a winit key event.
    pub fn process_event(&mut self, event: &KeyEvent) {
        if let Some(raw) = RawKeyEvent::from_winit(event) {
            self.process_raw(raw);
        }
    }

    /// Applies a key event; repeats are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(event.key) {
                    self.pressed_this_frame.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.held.remove(&event.key) {
                    self.released_this_frame.insert(event.key);
                }
            }
        }
    }

    /// Whether `key` is held.
    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Whether `key` went down this frame.
    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.pressed_this_frame.contains(&key)
    }

    /// Whether `key` went up this frame.
    #[must_use]
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.released_this_frame.contains(&key)
    }

    /// Releases every held key, e.g. when the window loses focus and the
    /// matching release events will never arrive.
    pub fn release_all(&mut self) {
        self.released_this_frame.extend(self.held.drain());
    }

    /// Forgets this frame's transitions.
    pub fn clear_transients(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
    }
}
