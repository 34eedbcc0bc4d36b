//! Keyboard and mouse input: frame-coherent state trackers and the mapping
//! from keys to viewer actions.

pub mod action_map;
pub mod keyboard;
pub mod mouse;

pub use action_map::{Action, InputMap};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
