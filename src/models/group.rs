//! Color groups: the palette indices a recolor controls and how it varies them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Number of colours in a fixed gradient (one ramp).
pub const GRADIENT_LEN: usize = 8;

/// Hue ranges narrower than this (in degrees) mean "no distinct range".
pub const MIN_HUE_SPAN: f64 = 10.0;

/// Named first/last colour pairs for skin-tone gradients.
pub const SKIN_PRESETS: [(&str, Color, Color); 3] = [
    ("moreno-medio", Color::new(224, 184, 138), Color::new(90, 47, 27)),
    ("moreno-escuro", Color::new(211, 160, 108), Color::new(63, 31, 18)),
    ("negro", Color::new(192, 138, 90), Color::new(26, 11, 6)),
];

/// Look up a skin preset by name, ignoring case.
pub fn skin_preset(name: &str) -> Option<(Color, Color)> {
    SKIN_PRESETS
        .iter()
        .find(|(preset, _, _)| preset.eq_ignore_ascii_case(name))
        .map(|&(_, first, last)| (first, last))
}

/// Eight evenly stepped colours from `first` to `last`. Channels truncate,
/// with the same 1e-9 allowance as byte conversion so both ends come out exact.
pub fn interpolate_gradient(first: Color, last: Color) -> [Color; GRADIENT_LEN] {
    let step = |a: u8, b: u8, i: usize| {
        let value = (f64::from(b) - f64::from(a)) / (GRADIENT_LEN - 1) as f64 * i as f64
            + f64::from(a);
        (value + 1e-9).floor().clamp(0.0, 255.0) as u8
    };
    std::array::from_fn(|i| {
        Color::new(step(first.r, last.r, i), step(first.g, last.g, i), step(first.b, last.b, i))
    })
}

/// How a variable group is previewed in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupMode {
    /// Rotate the existing hue
    #[default]
    HueShift,
    /// Replace the hue, keeping value
    Colorize,
}

/// A hue band in degrees, `[start, end)`. `end < start` wraps through 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HueRange {
    pub start: f64,
    pub end: f64,
}

impl Default for HueRange {
    fn default() -> Self {
        Self { start: 0.0, end: 360.0 }
    }
}

/// A hue range after wrap handling: samples live in `[start, start + span)`,
/// taken modulo 360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHueRange {
    pub start: f64,
    pub span: f64,
}

impl HueRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Resolve the band the generator samples from.
    ///
    /// A band under 10 degrees means the artist picked one colour twice, so the
    /// whole wheel is used. A negative band wraps through red.
    pub fn resolve(&self) -> ResolvedHueRange {
        let span = self.end - self.start;
        if span.abs() < MIN_HUE_SPAN {
            ResolvedHueRange { start: 0.0, span: 360.0 }
        } else if span < 0.0 {
            ResolvedHueRange { start: self.start, span: span + 360.0 }
        } else {
            ResolvedHueRange { start: self.start, span }
        }
    }
}

/// What a group does to its indices during generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GroupKind {
    /// Hue is sampled per variant from `hue_range`.
    Variable {
        #[serde(default)]
        mode: GroupMode,
        #[serde(default)]
        hue_range: HueRange,
        /// Preview hue, in turns
        #[serde(default)]
        hue_shift: f64,
    },
    /// Indices are painted from a fixed 8-colour ramp; hue never varies.
    FixedGradient { colors: [Color; GRADIENT_LEN] },
}

impl Default for GroupKind {
    fn default() -> Self {
        GroupKind::Variable { mode: GroupMode::default(), hue_range: HueRange::default(), hue_shift: 0.0 }
    }
}

/// A named set of palette indices recolored together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorGroup {
    pub name: String,
    pub indices: BTreeSet<u8>,
    pub kind: GroupKind,
    #[serde(default)]
    pub sat_shift: f64,
    #[serde(default)]
    pub val_shift: f64,
}

impl ColorGroup {
    /// A variable group over the full hue wheel with no shifts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indices: BTreeSet::new(),
            kind: GroupKind::default(),
            sat_shift: 0.0,
            val_shift: 0.0,
        }
    }

    /// A variable group sampling hues from `start..end` degrees.
    pub fn variable(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            kind: GroupKind::Variable {
                mode: GroupMode::Colorize,
                hue_range: HueRange::new(start, end),
                hue_shift: 0.0,
            },
            ..Self::new(name)
        }
    }

    /// A fixed-gradient group.
    pub fn fixed(name: impl Into<String>, colors: [Color; GRADIENT_LEN]) -> Self {
        Self { kind: GroupKind::FixedGradient { colors }, ..Self::new(name) }
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = u8>) -> Self {
        self.set_indices(indices);
        self
    }

    pub fn with_shifts(mut self, sat_shift: f64, val_shift: f64) -> Self {
        self.sat_shift = sat_shift;
        self.val_shift = val_shift;
        self
    }

    pub fn add_index(&mut self, index: u8) {
        self.indices.insert(index);
    }

    pub fn remove_index(&mut self, index: u8) -> bool {
        self.indices.remove(&index)
    }

    pub fn set_indices(&mut self, indices: impl IntoIterator<Item = u8>) {
        self.indices = indices.into_iter().collect();
    }

    pub fn owns(&self, index: u8) -> bool {
        self.indices.contains(&index)
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, GroupKind::FixedGradient { .. })
    }
}
