//! Keyboard bindings for the orrery: discrete [`Action`]s mapped from
//! physical keys, with user overrides read from configuration.

pub mod action;
pub mod bindings;
pub mod keys;

pub use action::Action;
pub use bindings::{BindingError, InputMap, RawKeyEvent};
pub use keys::{key_name, parse_key};
