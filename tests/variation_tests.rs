//! Library-level tests of the variation pipeline: project state in,
//! palette files out.

use std::collections::HashSet;
use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sprpal::codec::{pal, CodecError};
use sprpal::color::Color;
use sprpal::config::{load_config, CONFIG_FILE_NAME};
use sprpal::models::{ColorGroup, Palette, ProjectState};
use sprpal::variation::{
    spawn_batch, BatchRequest, HuePlan, HueSampling, RenderOptions, VariationEngine,
    VariationError,
};
use tempfile::TempDir;

fn red_ramp() -> Palette {
    Palette::from_fn(|i| Color::new(i, i / 4, i / 4))
}

#[test]
fn test_stratified_batch_spreads_hues() {
    let groups = vec![ColorGroup::variable("cloth", 0.0, 360.0).with_indices(200..208)];
    let palettes =
        VariationEngine::seeded(11).variations(&red_ramp(), &groups, 12, &RenderOptions::default());

    // Every variant lands in its own 30 degree slice; samples stay in the
    // lower 24 degrees, so a 3 degree nudge absorbs 8-bit rounding
    let slices: HashSet<usize> = palettes
        .iter()
        .map(|p| ((p[204].to_hsv().h * 360.0 + 3.0) / 30.0).floor() as usize % 12)
        .collect();
    assert_eq!(slices.len(), 12);
}

#[test]
fn test_even_plan_is_deterministic() {
    let groups = vec![
        ColorGroup::variable("a", 0.0, 360.0).with_indices([10]),
        ColorGroup::variable("b", 0.0, 360.0).with_indices([20]),
    ];
    let mut rng = StdRng::seed_from_u64(3);
    let plan = HuePlan::build(&groups, 5, HueSampling::Even, &mut rng);
    assert_eq!(plan.samples(0), Some(&[0.0, 72.0, 144.0, 216.0, 288.0][..]));
    assert_eq!(plan.samples(0), plan.samples(1));
}

#[test]
fn test_overlapping_groups_apply_in_order() {
    let groups = vec![
        ColorGroup::variable("first", 100.0, 140.0).with_indices([50]),
        ColorGroup::fixed("second", [Color::new(0, 0, 255); 8]).with_indices([50]),
    ];
    let palettes =
        VariationEngine::seeded(1).variations(&red_ramp(), &groups, 3, &RenderOptions::default());
    for palette in palettes {
        assert!(palette[50].approx_eq(Color::new(0, 0, 255), 1));
    }
}

#[test]
fn test_config_project_end_to_end() {
    let dir = TempDir::new().unwrap();
    pal::save(&dir.path().join("base.pal"), red_ramp().colors()).unwrap();
    let config = r##"
[project]
name = "e2e"
base = "base.pal"

[generate]
count = 3
targets = ["Knight"]
seed = 5

[[groups]]
name = "skin"
indices = ["8-15"]
gradient = ["#000000", "#202020", "#404040", "#606060", "#808080", "#a0a0a0", "#c0c0c0", "#e0e0e0"]
"##;
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, config).unwrap();

    let loaded = load_config(Some(&path)).unwrap();
    let state = loaded.project_state().unwrap();
    let request = loaded.general_request(&state);
    let written = VariationEngine::seeded(5).generate(&request, None).unwrap();
    assert_eq!(written.len(), 6);

    for file in &written {
        let palette = pal::load(file).unwrap();
        assert!(palette[8].approx_eq(Color::new(0, 0, 0), 1));
        assert!(palette[15].approx_eq(Color::new(0xe0, 0xe0, 0xe0), 1));
        assert_eq!(palette[16], red_ramp()[16]);
    }
}

#[test]
fn test_project_state_editing_feeds_engine() {
    let mut state = ProjectState::new(red_ramp());
    state.add_group("armor").add_index(33);
    assert!(state.toggle_ramp("armor", 33));
    let request = BatchRequest::general(
        state.base.clone(),
        state.groups.clone(),
        2,
        "unused",
        vec![],
        "armor",
    );
    assert_eq!(request.total_files(), 4);
    let palettes = VariationEngine::seeded(2).variations(
        &request.base,
        &request.groups,
        request.count,
        &request.options,
    );
    // Two stratified samples come from disjoint half-wheel slices
    assert_ne!(palettes[0][36], palettes[1][36]);
    assert_eq!(palettes[0][40], red_ramp()[40]);
}

#[test]
fn test_background_batch_failure_propagates() {
    let dir = TempDir::new().unwrap();
    let not_a_dir = dir.path().join("file");
    fs::write(&not_a_dir, b"x").unwrap();
    let request = BatchRequest::general(red_ramp(), vec![], 2, &not_a_dir, vec![], "p");
    let handle = spawn_batch(VariationEngine::seeded(0), request);
    let events: Vec<_> = handle.progress().iter().collect();
    assert!(events.is_empty());
    match handle.join() {
        Err(VariationError::Codec(CodecError::Io { path, .. })) => assert_eq!(path, not_a_dir),
        other => panic!("unexpected result: {other:?}"),
    }
}
