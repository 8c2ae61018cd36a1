//! HSV-space colour transforms
//!
//! Every transform converts the 8-bit colour to normalized HSV, edits it, and
//! truncates back to 8 bits. Hue arguments are fractions of a full turn, so
//! `1.0` is 360 degrees.

use crate::color::{clamp01, Color, Hsv};

/// Rotate the hue by `delta` turns, leaving saturation and value alone.
pub fn hue_shift(color: Color, delta: f64) -> Color {
    let hsv = color.to_hsv();
    Hsv::new((hsv.h + delta).rem_euclid(1.0), hsv.s, hsv.v).to_color()
}

/// Rotate hue and scale saturation and value.
///
/// `adjust(c, 0.0, 1.0, 1.0)` is the identity up to rounding.
pub fn adjust(color: Color, hue_shift: f64, sat_mult: f64, val_mult: f64) -> Color {
    let hsv = color.to_hsv();
    Hsv::new(
        (hsv.h + hue_shift).rem_euclid(1.0),
        clamp01(hsv.s * sat_mult),
        clamp01(hsv.v * val_mult),
    )
    .to_color()
}

/// Force a hue (and optionally a saturation) while keeping relative brightness.
///
/// This is how a white or grey ramp gets dyed: its value carries the shading,
/// the target hue and saturation carry the colour.
pub fn colorize(color: Color, target_hue: f64, target_sat: Option<f64>, val_mult: f64) -> Color {
    let hsv = color.to_hsv();
    Hsv::new(
        target_hue.rem_euclid(1.0),
        target_sat.map(clamp01).unwrap_or(hsv.s),
        clamp01(hsv.v * val_mult),
    )
    .to_color()
}
