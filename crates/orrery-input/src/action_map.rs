//! Maps viewer actions to physical keys.

use std::collections::HashMap;

use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Things the user can ask the viewer to do from the keyboard.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    /// Start orbiting the configured target body.
    Orbit,
    /// Return the camera to its starting state.
    ResetCamera,
    TogglePause,
    Exit,
}

impl Action {
    /// Actions applied every frame while their key is held.
    pub const CONTINUOUS: [Action; 4] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
    ];
}

/// Key bindings for each [`Action`]. An action may have several keys.
#[derive(Debug, Clone)]
pub struct InputMap {
    bindings: HashMap<Action, Vec<KeyCode>>,
}

impl Default for InputMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(Action::MoveForward, KeyCode::KeyW);
        map.bind(Action::MoveBackward, KeyCode::KeyS);
        map.bind(Action::MoveLeft, KeyCode::KeyA);
        map.bind(Action::MoveRight, KeyCode::KeyD);
        map.bind(Action::Orbit, KeyCode::KeyO);
        map.bind(Action::ResetCamera, KeyCode::KeyR);
        map.bind(Action::TogglePause, KeyCode::KeyP);
        map.bind(Action::Exit, KeyCode::Escape);
        map
    }
}

impl InputMap {
    /// A map with nothing bound.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Adds `key` as a trigger for `action`.
    pub fn bind(&mut self, action: Action, key: KeyCode) {
        let keys = self.bindings.entry(action).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Removes every key bound to `action`.
    pub fn unbind(&mut self, action: Action) {
        self.bindings.remove(&action);
    }

    /// Keys bound to `action`.
    pub fn keys(&self, action: Action) -> &[KeyCode] {
        self.bindings.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Whether any key for `action` is held.
    pub fn is_held(&self, action: Action, keyboard: &KeyboardState) -> bool {
        self.keys(action).iter().any(|&k| keyboard.is_pressed(k))
    }

    /// Whether any key for `action` went down this frame.
    pub fn triggered(&self, action: Action, keyboard: &KeyboardState) -> bool {
        self.keys(action).iter().any(|&k| keyboard.just_pressed(k))
    }
}
