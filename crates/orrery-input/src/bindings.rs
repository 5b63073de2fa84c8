//! Key to action mapping.
//!
//! [`InputMap`] starts from the built-in layout and applies overrides from the
//! config's `input.keybindings` table (action name to key name). Overrides
//! replace the action's default key; a key claimed by two actions is rejected.

use std::collections::HashMap;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::action::Action;
use crate::keys::{key_name, parse_key};

/// Minimal description of a key event, independent of winit's event type.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// Problems in the keybinding overrides.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown action '{0}' in keybindings")]
    UnknownAction(String),

    #[error("unknown key '{key}' bound to '{action}'")]
    UnknownKey { action: String, key: String },

    #[error("key {key} is bound to both '{first}' and '{second}'")]
    Conflict {
        key: String,
        first: &'static str,
        second: &'static str,
    },
}

/// Physical key to action lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMap {
    keys: HashMap<KeyCode, Action>,
}

impl Default for InputMap {
    fn default() -> Self {
        let keys = [
            (KeyCode::KeyW, Action::DollyForward),
            (KeyCode::KeyS, Action::DollyBackward),
            (KeyCode::Digit1, Action::ShadingReset),
            (KeyCode::Digit2, Action::CelShading),
            (KeyCode::Digit3, Action::NormalMapOff),
            (KeyCode::Digit4, Action::NormalMapOn),
            (KeyCode::Digit7, Action::ToggleGreyscale),
            (KeyCode::Digit8, Action::ToggleFlipX),
            (KeyCode::Digit9, Action::ToggleFlipY),
            (KeyCode::Digit0, Action::ToggleBlur),
            (KeyCode::Escape, Action::Quit),
        ]
        .into_iter()
        .collect();
        Self { keys }
    }
}

impl InputMap {
    /// Default layout with `overrides` (action name -> key name) applied.
    ///
    /// Overridden actions release their default keys before any new key is
    /// claimed, so two actions can swap keys in one table.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self, BindingError> {
        let mut map = Self::default();

        // Sort so conflicts are reported deterministically.
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort();

        let mut resolved = Vec::with_capacity(entries.len());
        for (action_name, key) in entries {
            let action = Action::from_name(action_name)
                .ok_or_else(|| BindingError::UnknownAction(action_name.clone()))?;
            let code = parse_key(key).ok_or_else(|| BindingError::UnknownKey {
                action: action_name.clone(),
                key: key.clone(),
            })?;
            resolved.push((action, code));
        }

        map.keys.retain(|_, bound| !resolved.iter().any(|(action, _)| *action == *bound));
        for (action, code) in resolved {
            map.rebind(action, code)?;
            log::debug!("Bound {} to {}", action.name(), key_name(code).unwrap_or("?"));
        }
        Ok(map)
    }

    /// Move `action` to `code`, dropping its previous key.
    pub fn rebind(&mut self, action: Action, code: KeyCode) -> Result<(), BindingError> {
        if let Some(&existing) = self.keys.get(&code)
            && existing != action
        {
            // The other action still holds its default key; it must be
            // moved explicitly before this key becomes free.
            return Err(BindingError::Conflict {
                key: key_name(code).unwrap_or("?").to_string(),
                first: existing.name(),
                second: action.name(),
            });
        }
        self.keys.retain(|_, bound| *bound != action);
        self.keys.insert(code, action);
        Ok(())
    }

    /// Key currently bound to `action`.
    pub fn key_for(&self, action: Action) -> Option<KeyCode> {
        self.keys
            .iter()
            .find(|(_, bound)| **bound == action)
            .map(|(code, _)| *code)
    }

    /// Action fired by `event`, if any.
    ///
    /// Releases never fire. Repeats fire only for actions that repeat.
    pub fn resolve(&self, event: RawKeyEvent) -> Option<Action> {
        if event.state != ElementState::Pressed {
            return None;
        }
        let PhysicalKey::Code(code) = event.key else {
            return None;
        };
        let action = *self.keys.get(&code)?;
        if event.repeat && !action.repeats() {
            return None;
        }
        Some(action)
    }
}
