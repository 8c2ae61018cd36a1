//! Hue planning for a batch
//!
//! Each variable group gets one hue per variant, drawn once per batch so the
//! spread across the batch holds. Hues are in degrees until
//! [`HuePlan::hue_for`] normalizes them to turns.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{ColorGroup, GroupKind, ResolvedHueRange};

/// Fractional part of the golden ratio.
pub const GOLDEN_RATIO_FRACTION: f64 = 0.618033988749895;

/// Share of each stratified slice a sample may land in. Keeping clear of the
/// upper edge stops neighbouring slices from producing near-identical hues.
pub const STRATIFIED_SPREAD: f64 = 0.8;

/// How hues are spread over a group's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HueSampling {
    /// One jittered sample per equal slice, then shuffled
    #[default]
    Stratified,
    /// Slice starts, in order, with no randomness
    Even,
    /// Golden-ratio rotation folded into the range, jittered and shuffled
    GoldenRatio,
}

/// One sample per slice, in slice order.
pub fn stratified_samples<R: Rng>(
    range: ResolvedHueRange,
    count: usize,
    rng: &mut R,
) -> Vec<f64> {
    let width = slice_width(range, count);
    (0..count)
        .map(|k| range.start + k as f64 * width + rng.gen_range(0.0..=STRATIFIED_SPREAD * width))
        .collect()
}

/// The start of each slice.
pub fn even_samples(range: ResolvedHueRange, count: usize) -> Vec<f64> {
    let width = slice_width(range, count);
    (0..count).map(|k| range.start + k as f64 * width).collect()
}

/// Successive golden-ratio turns from a random offset, each folded back into
/// the range with up to half a slice of jitter. An empty range yields its
/// start for every sample.
pub fn golden_ratio_samples<R: Rng>(
    range: ResolvedHueRange,
    count: usize,
    rng: &mut R,
) -> Vec<f64> {
    if range.span <= 0.0 {
        return vec![range.start; count];
    }
    let half = slice_width(range, count) * 0.5;
    let offset = rng.gen_range(0.0..360.0);
    (0..count)
        .map(|k| {
            let golden = (offset + k as f64 * GOLDEN_RATIO_FRACTION * 360.0).rem_euclid(360.0);
            let jitter = rng.gen_range(-half..=half);
            range.start + (golden - range.start + jitter).rem_euclid(range.span)
        })
        .collect()
}

/// Sample `count` hues (degrees) for one range. Random strategies come back
/// shuffled so variant order does not follow hue order.
pub fn sample_hues<R: Rng>(
    range: ResolvedHueRange,
    count: usize,
    sampling: HueSampling,
    rng: &mut R,
) -> Vec<f64> {
    let mut hues = match sampling {
        HueSampling::Stratified => stratified_samples(range, count, rng),
        HueSampling::Even => return even_samples(range, count),
        HueSampling::GoldenRatio => golden_ratio_samples(range, count, rng),
    };
    hues.shuffle(rng);
    hues
}

fn slice_width(range: ResolvedHueRange, count: usize) -> f64 {
    range.span / count.max(1) as f64
}

/// Hue samples for every variable group of one batch, keyed by group position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HuePlan {
    hues: HashMap<usize, Vec<f64>>,
}

impl HuePlan {
    /// Sample every variable group once. Fixed-gradient groups get no entry.
    pub fn build<R: Rng>(
        groups: &[ColorGroup],
        count: usize,
        sampling: HueSampling,
        rng: &mut R,
    ) -> Self {
        let mut hues = HashMap::new();
        for (position, group) in groups.iter().enumerate() {
            if let GroupKind::Variable { hue_range, .. } = &group.kind {
                let samples = sample_hues(hue_range.resolve(), count, sampling, rng);
                log::debug!("group '{}': hues {:?}", group.name, samples);
                hues.insert(position, samples);
            }
        }
        Self { hues }
    }

    /// Degrees sampled for a group, in variant order.
    pub fn samples(&self, group: usize) -> Option<&[f64]> {
        self.hues.get(&group).map(Vec::as_slice)
    }

    /// Hue for `variant` of `group`, as a fraction of a turn.
    pub fn hue_for(&self, group: usize, variant: usize) -> Option<f64> {
        let degrees = *self.hues.get(&group)?.get(variant)?;
        Some(degrees.rem_euclid(360.0) / 360.0)
    }
}
