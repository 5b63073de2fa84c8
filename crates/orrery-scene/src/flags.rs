//! Shading and post-effect bitmasks, and the mode state that produces them.

use std::ops::{BitOr, BitOrAssign};

/// Per-draw lighting selection, uploaded as `body.flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShadingFlags(u32);

impl ShadingFlags {
    /// Unlit: the texture color as is.
    pub const NONE: Self = Self(0);
    /// Phong lighting from the sun.
    pub const SHADE: Self = Self(1);
    /// Banded lighting with a dark silhouette.
    pub const CEL: Self = Self(2);
    /// Perturb normals with the body's normal map.
    pub const NORMAL_MAP: Self = Self(4);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ShadingFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ShadingFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Screen-space effects applied by the composite pass, uploaded as `post.effects`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EffectFlags(u32);

impl EffectFlags {
    pub const NONE: Self = Self(0);
    pub const FLIP_X: Self = Self(1);
    pub const FLIP_Y: Self = Self(2);
    pub const GREYSCALE: Self = Self(4);
    pub const BLUR: Self = Self(8);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Flip the given bits.
    pub fn toggle(&mut self, other: Self) {
        self.0 ^= other.0;
    }
}

impl BitOr for EffectFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Viewer toggles. Written by input handling, read once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeState {
    pub cel: bool,
    pub normal_map: bool,
    pub effects: EffectFlags,
}

impl ModeState {
    pub fn set_cel(&mut self, enabled: bool) {
        self.cel = enabled;
    }

    pub fn set_normal_map(&mut self, enabled: bool) {
        self.normal_map = enabled;
    }

    pub fn toggle_effect(&mut self, effect: EffectFlags) {
        self.effects.toggle(effect);
    }

    /// One-line summary for the text overlay.
    pub fn status_line(&self) -> String {
        let shading = if self.cel { "CEL" } else { "PHONG" };
        let normals = if self.normal_map { "ON" } else { "OFF" };

        let mut effects: Vec<&str> = [
            (EffectFlags::FLIP_X, "FLIPX"),
            (EffectFlags::FLIP_Y, "FLIPY"),
            (EffectFlags::BLUR, "BLUR"),
            (EffectFlags::GREYSCALE, "GREY"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.effects.contains(*flag))
        .map(|(_, label)| label)
        .collect();
        if effects.is_empty() {
            effects.push("NONE");
        }

        format!(
            "SHADING {shading}  NORMALS {normals}  FX {}",
            effects.join("+")
        )
    }
}
