//! Palette types.

use std::ops::{Index, IndexMut};

use thiserror::Error;

use crate::color::Color;

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 256;

/// Error raised when a colour list is not exactly [`PALETTE_SIZE`] long.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("invalid palette length {0}, expected {PALETTE_SIZE} colors")]
    InvalidLength(usize),
}

/// An ordered table of exactly 256 colours.
///
/// Index 0 is conventionally the transparent/background entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette, rejecting any length other than 256.
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.len() != PALETTE_SIZE {
            return Err(PaletteError::InvalidLength(colors.len()));
        }
        Ok(Self { colors })
    }

    /// A palette with every entry set to `color`.
    pub fn filled(color: Color) -> Self {
        Self { colors: vec![color; PALETTE_SIZE] }
    }

    /// A palette where entry `i` is `f(i)`.
    pub fn from_fn(mut f: impl FnMut(u8) -> Color) -> Self {
        Self { colors: (0..=255u8).map(&mut f).collect() }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::filled(Color::BLACK)
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = PaletteError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Palette::new(colors)
    }
}

impl Index<u8> for Palette {
    type Output = Color;

    fn index(&self, index: u8) -> &Color {
        &self.colors[index as usize]
    }
}

impl IndexMut<u8> for Palette {
    fn index_mut(&mut self, index: u8) -> &mut Color {
        &mut self.colors[index as usize]
    }
}

/// A palette entry as stored in a sprite file: colour plus the reserved/alpha byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Color,
    pub alpha: u8,
}

/// The 256-entry palette embedded at the end of a sprite file.
///
/// Unlike [`Palette`], the reserved byte is kept; viewers use it to decide
/// which indices are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPalette {
    entries: Vec<PaletteEntry>,
}

impl EmbeddedPalette {
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.len() != PALETTE_SIZE {
            return Err(PaletteError::InvalidLength(entries.len()));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn entry(&self, index: u8) -> PaletteEntry {
        self.entries[index as usize]
    }

    /// Drop the alpha bytes.
    pub fn to_palette(&self) -> Palette {
        Palette { colors: self.entries.iter().map(|e| e.color).collect() }
    }
}

/// Indices of the 8-entry ramp containing `index`.
pub fn ramp_indices(index: u8) -> std::ops::RangeInclusive<u8> {
    let start = index & !0x07;
    start..=start + 7
}
