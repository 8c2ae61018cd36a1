//! Data models shared by the codecs and the variation engine.

mod group;
mod palette;
mod project;
mod sprite;

pub use group::{
    interpolate_gradient, skin_preset, ColorGroup, GroupKind, GroupMode, HueRange,
    ResolvedHueRange, GRADIENT_LEN, MIN_HUE_SPAN, SKIN_PRESETS,
};
pub use palette::{ramp_indices, EmbeddedPalette, Palette, PaletteEntry, PaletteError, PALETTE_SIZE};
pub use project::{OutputNaming, ProjectState, DEFAULT_PREFIX};
pub use sprite::{Frame, Sprite, SpriteVersion};
