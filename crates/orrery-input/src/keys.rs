//! Key names as they appear in `config.ron`.
//!
//! Names follow winit's `KeyCode` variants (`KeyW`, `Digit1`, `Escape`).
//! Single letters and digits are accepted as shorthand.

use winit::keyboard::KeyCode;

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("KeyA", KeyCode::KeyA),
    ("KeyB", KeyCode::KeyB),
    ("KeyC", KeyCode::KeyC),
    ("KeyD", KeyCode::KeyD),
    ("KeyE", KeyCode::KeyE),
    ("KeyF", KeyCode::KeyF),
    ("KeyG", KeyCode::KeyG),
    ("KeyH", KeyCode::KeyH),
    ("KeyI", KeyCode::KeyI),
    ("KeyJ", KeyCode::KeyJ),
    ("KeyK", KeyCode::KeyK),
    ("KeyL", KeyCode::KeyL),
    ("KeyM", KeyCode::KeyM),
    ("KeyN", KeyCode::KeyN),
    ("KeyO", KeyCode::KeyO),
    ("KeyP", KeyCode::KeyP),
    ("KeyQ", KeyCode::KeyQ),
    ("KeyR", KeyCode::KeyR),
    ("KeyS", KeyCode::KeyS),
    ("KeyT", KeyCode::KeyT),
    ("KeyU", KeyCode::KeyU),
    ("KeyV", KeyCode::KeyV),
    ("KeyW", KeyCode::KeyW),
    ("KeyX", KeyCode::KeyX),
    ("KeyY", KeyCode::KeyY),
    ("KeyZ", KeyCode::KeyZ),
    ("Digit0", KeyCode::Digit0),
    ("Digit1", KeyCode::Digit1),
    ("Digit2", KeyCode::Digit2),
    ("Digit3", KeyCode::Digit3),
    ("Digit4", KeyCode::Digit4),
    ("Digit5", KeyCode::Digit5),
    ("Digit6", KeyCode::Digit6),
    ("Digit7", KeyCode::Digit7),
    ("Digit8", KeyCode::Digit8),
    ("Digit9", KeyCode::Digit9),
    ("ArrowUp", KeyCode::ArrowUp),
    ("ArrowDown", KeyCode::ArrowDown),
    ("ArrowLeft", KeyCode::ArrowLeft),
    ("ArrowRight", KeyCode::ArrowRight),
    ("Space", KeyCode::Space),
    ("Enter", KeyCode::Enter),
    ("Escape", KeyCode::Escape),
    ("Tab", KeyCode::Tab),
];

/// Parse a key name. Accepts `KeyW`, `W`, `w`, `Digit1` and `1`.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let mut chars = name.chars();
    let canonical = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
        (Some(c), None) if c.is_ascii_digit() => format!("Digit{c}"),
        _ => name.to_string(),
    };
    NAMED_KEYS
        .iter()
        .find(|(key_name, _)| *key_name == canonical)
        .map(|(_, code)| *code)
}

/// Canonical name of a key, if it has one.
pub fn key_name(code: KeyCode) -> Option<&'static str> {
    NAMED_KEYS
        .iter()
        .find(|(_, key)| *key == code)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(parse_key("KeyW"), Some(KeyCode::KeyW));
        assert_eq!(parse_key("Digit0"), Some(KeyCode::Digit0));
        assert_eq!(parse_key("Escape"), Some(KeyCode::Escape));
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(parse_key("w"), Some(KeyCode::KeyW));
        assert_eq!(parse_key("S"), Some(KeyCode::KeyS));
        assert_eq!(parse_key("7"), Some(KeyCode::Digit7));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(parse_key("Hyper"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn test_key_name_inverse() {
        for (name, code) in NAMED_KEYS {
            assert_eq!(key_name(*code), Some(*name));
            assert_eq!(parse_key(name), Some(*code));
        }
    }
}
