//! Rendering one variant palette from a base palette and its groups.

use rand::Rng;

use super::hue::HuePlan;
use crate::color::{clamp01, Color, Hsv};
use crate::models::{ColorGroup, GroupKind, Palette, GRADIENT_LEN};
use crate::transforms::colorize;

/// Range of the per-variant saturation drift.
pub const SAT_DRIFT: f64 = 0.3;
/// Range of the per-variant brightness drift.
pub const VAL_DRIFT: f64 = 0.15;

/// Per-pixel jitter of the fine-grained ramp generator.
pub const MICRO_HUE: f64 = 0.03;
pub const MICRO_SAT: f64 = 0.08;
pub const MICRO_VAL: f64 = 0.05;

/// Saturation and brightness offsets shared by every group and pixel of one variant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Drift {
    pub sat: f64,
    pub val: f64,
}

impl Drift {
    /// Draw one variant's drift. Disabled channels stay at zero and draw nothing.
    pub fn draw<R: Rng>(random_saturation: bool, random_brightness: bool, rng: &mut R) -> Self {
        let sat = if random_saturation { rng.gen_range(-SAT_DRIFT..=SAT_DRIFT) } else { 0.0 };
        let val = if random_brightness { rng.gen_range(-VAL_DRIFT..=VAL_DRIFT) } else { 0.0 };
        Self { sat, val }
    }
}

/// Sorted `(index, colour)` pairs a fixed-gradient group paints.
///
/// The j-th of N sorted indices takes gradient slot `floor(j * 7 / (N - 1))`,
/// so the first index gets the first colour and the last index the last.
pub fn fixed_gradient_colors(
    group: &ColorGroup,
    gradient: &[Color; GRADIENT_LEN],
) -> Vec<(u8, Color)> {
    let last_slot = GRADIENT_LEN - 1;
    let divisor = group.indices.len().saturating_sub(1).max(1);
    let val_mult = 1.0 + group.val_shift;

    group
        .indices
        .iter()
        .enumerate()
        .map(|(j, &index)| {
            let slot = (j * last_slot / divisor).min(last_slot);
            let hsv = gradient[slot].to_hsv();
            let color =
                Hsv::new(hsv.h, clamp01(hsv.s + group.sat_shift), clamp01(hsv.v * val_mult))
                    .to_color();
            (index, color)
        })
        .collect()
}

/// Dye every index of a variable group to `hue`, applying the group shifts
/// and the variant drift.
pub fn apply_variable(palette: &mut Palette, group: &ColorGroup, hue: f64, drift: Drift) {
    let val_mult = 1.0 + group.val_shift + drift.val;
    for &index in &group.indices {
        let color = palette[index];
        let sat = clamp01(color.to_hsv().s + group.sat_shift + drift.sat);
        palette[index] = colorize(color, hue, Some(sat), val_mult);
    }
}

/// Like [`apply_variable`], with a small random wobble per pixel so ramps
/// read less mechanically.
pub fn apply_variable_jittered<R: Rng>(
    palette: &mut Palette,
    group: &ColorGroup,
    hue: f64,
    drift: Drift,
    rng: &mut R,
) {
    let sat_shift = group.sat_shift + drift.sat;
    let val_mult = 1.0 + group.val_shift + drift.val;
    for &index in &group.indices {
        let hsv = palette[index].to_hsv();
        let hue_micro = rng.gen_range(-MICRO_HUE..=MICRO_HUE);
        let sat_micro = rng.gen_range(-MICRO_SAT..=MICRO_SAT);
        let val_micro = rng.gen_range(-MICRO_VAL..=MICRO_VAL);
        palette[index] = Hsv::new(
            (hue + hue_micro).rem_euclid(1.0),
            clamp01(hsv.s + sat_shift + sat_micro),
            clamp01(hsv.v * val_mult + val_micro),
        )
        .to_color();
    }
}

/// Render variant `variant` of a batch.
///
/// Groups apply in order to a copy of `base`; a later group sees the colours
/// an earlier group wrote to shared indices. Fixed-gradient groups ignore
/// the drift.
pub fn render_variant<R: Rng>(
    base: &Palette,
    groups: &[ColorGroup],
    plan: &HuePlan,
    variant: usize,
    drift: Drift,
    micro_jitter: bool,
    rng: &mut R,
) -> Palette {
    let mut palette = base.clone();
    for (position, group) in groups.iter().enumerate() {
        match &group.kind {
            GroupKind::FixedGradient { colors } => {
                for (index, color) in fixed_gradient_colors(group, colors) {
                    palette[index] = color;
                }
            }
            GroupKind::Variable { .. } => {
                let Some(hue) = plan.hue_for(position, variant) else {
                    continue;
                };
                if micro_jitter {
                    apply_variable_jittered(&mut palette, group, hue, drift, rng);
                } else {
                    apply_variable(&mut palette, group, hue, drift);
                }
            }
        }
    }
    palette
}
