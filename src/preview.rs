//! Live preview of a project's current group settings.

use crate::color::clamp01;
use crate::models::{ColorGroup, GroupKind, GroupMode, Palette};
use crate::transforms::{adjust, colorize};
use crate::variation::render::fixed_gradient_colors;

/// Apply every group once with its own preview hue and shifts.
///
/// Groups apply in order, so a later group sees what an earlier one wrote to
/// a shared index. `base` is left untouched.
pub fn preview_palette(base: &Palette, groups: &[ColorGroup]) -> Palette {
    let mut palette = base.clone();
    for group in groups {
        match &group.kind {
            GroupKind::FixedGradient { colors } => {
                for (index, color) in fixed_gradient_colors(group, colors) {
                    palette[index] = color;
                }
            }
            GroupKind::Variable { mode, hue_shift, .. } => {
                let val_mult = 1.0 + group.val_shift;
                for &index in &group.indices {
                    let color = palette[index];
                    palette[index] = match mode {
                        GroupMode::HueShift => {
                            adjust(color, *hue_shift, 1.0 + group.sat_shift, val_mult)
                        }
                        GroupMode::Colorize => {
                            colorize(color, *hue_shift, Some(clamp01(group.sat_shift)), val_mult)
                        }
                    };
                }
            }
        }
    }
    palette
}
