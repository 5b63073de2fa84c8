//! Discrete user actions.

/// Everything a key can do in the viewer.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Action {
    /// Move the camera toward what it faces.
    DollyForward,
    /// Move the camera away from what it faces.
    DollyBackward,
    /// Turn cel shading off.
    ShadingReset,
    /// Turn cel shading on.
    CelShading,
    /// Turn normal mapping off.
    NormalMapOff,
    /// Turn normal mapping on.
    NormalMapOn,
    ToggleGreyscale,
    ToggleFlipX,
    ToggleFlipY,
    ToggleBlur,
    /// Close the window.
    Quit,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::DollyForward,
        Action::DollyBackward,
        Action::ShadingReset,
        Action::CelShading,
        Action::NormalMapOff,
        Action::NormalMapOn,
        Action::ToggleGreyscale,
        Action::ToggleFlipX,
        Action::ToggleFlipY,
        Action::ToggleBlur,
        Action::Quit,
    ];

    /// Name used for this action in the config file's keybinding table.
    pub fn name(self) -> &'static str {
        match self {
            Action::DollyForward => "dolly_forward",
            Action::DollyBackward => "dolly_backward",
            Action::ShadingReset => "shading_reset",
            Action::CelShading => "cel_shading",
            Action::NormalMapOff => "normal_map_off",
            Action::NormalMapOn => "normal_map_on",
            Action::ToggleGreyscale => "toggle_greyscale",
            Action::ToggleFlipX => "toggle_flip_x",
            Action::ToggleFlipY => "toggle_flip_y",
            Action::ToggleBlur => "toggle_blur",
            Action::Quit => "quit",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// Held keys keep firing for camera motion; toggles fire once per press.
    pub fn repeats(self) -> bool {
        matches!(self, Action::DollyForward | Action::DollyBackward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("warp_drive"), None);
    }

    #[test]
    fn test_only_dolly_repeats() {
        let repeating: Vec<_> = Action::ALL.into_iter().filter(|a| a.repeats()).collect();
        assert_eq!(repeating, vec![Action::DollyForward, Action::DollyBackward]);
    }
}
