//! Variation engine
//!
//! Turns a base palette and its colour groups into a numbered batch of
//! derived palettes and writes them to disk. The engine is synchronous; see
//! [`spawn_batch`] for running a batch off the calling thread.
//!
//! Randomness comes from the engine's own generator in a fixed order (hue
//! plan, then per variant: drift, then per-pixel jitter), so a seeded engine
//! reproduces a batch byte for byte.

pub mod batch;
pub mod hue;
pub mod naming;
pub mod render;

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::codec::{pal, CodecError};
use crate::models::{ColorGroup, Palette};
use crate::swatch::{self, SwatchError};

pub use batch::{spawn_batch, BatchHandle};
pub use hue::{HuePlan, HueSampling};
pub use naming::NamingScheme;
pub use render::{render_variant, Drift};

#[derive(Debug, Error)]
pub enum VariationError {
    /// Reading or writing a palette failed; the error is passed through as is.
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("failed to write swatch {}: {source}", .path.display())]
    Swatch {
        path: PathBuf,
        #[source]
        source: SwatchError,
    },
    #[error("file numbers from {start} for {count} variants pass {}", u32::MAX)]
    NumberingOverflow { start: u32, count: usize },
    #[error("batch worker panicked")]
    WorkerPanicked,
}

/// Knobs that change how variants look.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderOptions {
    pub sampling: HueSampling,
    pub random_saturation: bool,
    pub random_brightness: bool,
    /// Per-pixel wobble; only the hair generator turns this on.
    pub micro_jitter: bool,
}

impl RenderOptions {
    /// Settings of the hair ramp generator.
    pub fn hair() -> Self {
        Self { sampling: HueSampling::GoldenRatio, micro_jitter: true, ..Self::default() }
    }
}

/// Everything one batch needs. The engine only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub base: Palette,
    pub groups: Vec<ColorGroup>,
    pub count: usize,
    pub start_number: u32,
    pub output_dir: PathBuf,
    pub naming: NamingScheme,
    pub options: RenderOptions,
    /// Also write a PNG swatch beside each variant's first file.
    pub swatches: bool,
}

impl BatchRequest {
    /// A general batch: two files per target name per variant.
    pub fn general(
        base: Palette,
        groups: Vec<ColorGroup>,
        count: usize,
        output_dir: impl Into<PathBuf>,
        targets: Vec<String>,
        default_name: &str,
    ) -> Self {
        Self {
            base,
            groups,
            count,
            start_number: 0,
            output_dir: output_dir.into(),
            naming: NamingScheme::targets(targets, default_name),
            options: RenderOptions::default(),
            swatches: false,
        }
    }

    /// A hair batch: one female and one male file per variant.
    pub fn hair(
        base: Palette,
        groups: Vec<ColorGroup>,
        count: usize,
        output_dir: impl Into<PathBuf>,
        style_count: u32,
    ) -> Self {
        Self {
            base,
            groups,
            count,
            start_number: 0,
            output_dir: output_dir.into(),
            naming: NamingScheme::hair(style_count),
            options: RenderOptions::hair(),
            swatches: false,
        }
    }

    pub fn with_start_number(mut self, start_number: u32) -> Self {
        self.start_number = start_number;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_swatches(mut self, swatches: bool) -> Self {
        self.swatches = swatches;
        self
    }

    /// Palette files the batch will write.
    pub fn total_files(&self) -> usize {
        self.count * self.naming.files_per_variant()
    }

    /// File number of `variant`, if it fits in `u32`.
    pub fn number_for(&self, variant: usize) -> Option<u32> {
        u32::try_from(variant).ok().and_then(|v| self.start_number.checked_add(v))
    }
}

/// Generates palette variations from one random source.
///
/// Each call samples a fresh hue plan, so calls never share state beyond the
/// generator. An engine is used from one thread at a time.
pub struct VariationEngine<R = StdRng> {
    rng: R,
}

impl VariationEngine<StdRng> {
    /// Reproducible engine.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl<R: Rng> VariationEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Render `count` variants in memory.
    pub fn variations(
        &mut self,
        base: &Palette,
        groups: &[ColorGroup],
        count: usize,
        options: &RenderOptions,
    ) -> Vec<Palette> {
        let plan = HuePlan::build(groups, count, options.sampling, &mut self.rng);
        (0..count)
            .map(|variant| {
                let drift =
                    Drift::draw(options.random_saturation, options.random_brightness, &mut self.rng);
                render_variant(
                    base,
                    groups,
                    &plan,
                    variant,
                    drift,
                    options.micro_jitter,
                    &mut self.rng,
                )
            })
            .collect()
    }

    /// Render a batch and write every file.
    ///
    /// `on_progress` is called once per palette file written with
    /// `(written so far, total)`. The first write failure stops the batch;
    /// files already written stay on disk. Returns the palette paths in
    /// write order.
    pub fn generate(
        &mut self,
        request: &BatchRequest,
        mut on_progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> Result<Vec<PathBuf>, VariationError> {
        if request.count > 0 && request.number_for(request.count - 1).is_none() {
            return Err(VariationError::NumberingOverflow {
                start: request.start_number,
                count: request.count,
            });
        }

        let total = request.total_files();
        log::info!(
            "generating {} variants ({} files) into {}",
            request.count,
            total,
            request.output_dir.display()
        );

        std::fs::create_dir_all(&request.output_dir)
            .map_err(|e| CodecError::write(&request.output_dir, e))?;

        let palettes =
            self.variations(&request.base, &request.groups, request.count, &request.options);

        let mut written = Vec::with_capacity(total);
        for (variant, palette) in palettes.iter().enumerate() {
            let Some(number) = request.number_for(variant) else {
                return Err(VariationError::NumberingOverflow {
                    start: request.start_number,
                    count: request.count,
                });
            };
            let names = request.naming.file_names(number);
            for name in &names {
                let path = request.output_dir.join(name);
                pal::save(&path, palette.colors())?;
                written.push(path);
                if let Some(callback) = on_progress.as_deref_mut() {
                    callback(written.len(), total);
                }
            }

            if request.swatches {
                if let Some(first) = names.first() {
                    let path = request.output_dir.join(first).with_extension("png");
                    swatch::save_swatch(palette, &path)
                        .map_err(|source| VariationError::Swatch { path, source })?;
                }
            }
        }

        log::info!("wrote {} palette files", written.len());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::variation::naming::{FEMALE_SUFFIX, MALE_SUFFIX};
    use tempfile::TempDir;

    fn base() -> Palette {
        Palette::from_fn(|i| Color::new(i, i / 2, 255 - i))
    }

    fn groups() -> Vec<ColorGroup> {
        vec![
            ColorGroup::variable("hair", 0.0, 360.0).with_indices(16..24),
            ColorGroup::variable("cloth", 350.0, 30.0).with_indices(40..48),
        ]
    }

    #[test]
    fn test_generate_names_and_numbers() {
        let dir = TempDir::new().unwrap();
        let request = BatchRequest::general(base(), groups(), 3, dir.path(), vec!["Foo".into()], "x")
            .with_start_number(100);
        let paths = VariationEngine::seeded(1).generate(&request, None).unwrap();
        assert_eq!(paths.len(), 6);

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        let mut expected = Vec::new();
        for n in 100..=102 {
            expected.push(format!("Foo{FEMALE_SUFFIX}_{n}.pal"));
            expected.push(format!("Foo{MALE_SUFFIX}_{n}.pal"));
        }
        expected.sort();
        assert_eq!(names, expected);
        for path in &paths {
            assert_eq!(std::fs::metadata(path).unwrap().len(), 1024);
        }
    }

    #[test]
    fn test_progress_is_monotonic_and_complete() {
        let dir = TempDir::new().unwrap();
        let request = BatchRequest::general(
            base(),
            groups(),
            4,
            dir.path(),
            vec!["A".into(), "B".into()],
            "x",
        );
        let mut events = Vec::new();
        let mut record = |current: usize, total: usize| events.push((current, total));
        VariationEngine::seeded(2).generate(&request, Some(&mut record)).unwrap();
        assert_eq!(events.len(), 16);
        assert!(events.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(events.iter().all(|&(_, total)| total == 16));
        assert_eq!(events.last(), Some(&(16, 16)));
    }

    #[test]
    fn test_seed_reproduces_files() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let options = RenderOptions {
            random_saturation: true,
            random_brightness: true,
            ..RenderOptions::default()
        };
        let req_a = BatchRequest::general(base(), groups(), 5, a.path(), vec![], "pal")
            .with_options(options);
        let req_b = BatchRequest { output_dir: b.path().to_path_buf(), ..req_a.clone() };
        let paths_a = VariationEngine::seeded(42).generate(&req_a, None).unwrap();
        let paths_b = VariationEngine::seeded(42).generate(&req_b, None).unwrap();
        for (pa, pb) in paths_a.iter().zip(&paths_b) {
            assert_eq!(pa.file_name(), pb.file_name());
            assert_eq!(std::fs::read(pa).unwrap(), std::fs::read(pb).unwrap());
        }
    }

    #[test]
    fn test_variations_leave_other_indices_alone() {
        let palettes =
            VariationEngine::seeded(3).variations(&base(), &groups(), 4, &RenderOptions::default());
        assert_eq!(palettes.len(), 4);
        for palette in &palettes {
            assert_eq!(palette[0], base()[0]);
            assert_eq!(palette[100], base()[100]);
        }
    }

    #[test]
    fn test_zero_count_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let request = BatchRequest::general(base(), groups(), 0, &out, vec![], "pal");
        let paths = VariationEngine::seeded(0).generate(&request, None).unwrap();
        assert!(paths.is_empty());
        assert!(out.is_dir());
    }

    #[test]
    fn test_write_failure_aborts_with_codec_error() {
        let dir = TempDir::new().unwrap();
        // A directory squatting on the second file name makes its write fail
        let blocker = dir.path().join(format!("Foo{MALE_SUFFIX}_0.pal"));
        std::fs::create_dir(&blocker).unwrap();
        let request = BatchRequest::general(base(), groups(), 3, dir.path(), vec!["Foo".into()], "x");
        let err = VariationEngine::seeded(5).generate(&request, None).unwrap_err();
        match err {
            VariationError::Codec(CodecError::Io { path, .. }) => assert_eq!(path, blocker),
            other => panic!("unexpected error: {other}"),
        }
        assert!(dir.path().join(format!("Foo{FEMALE_SUFFIX}_0.pal")).is_file());
        assert!(!dir.path().join(format!("Foo{FEMALE_SUFFIX}_1.pal")).exists());
    }

    #[test]
    fn test_numbering_overflow_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let request = BatchRequest::general(base(), groups(), 2, &out, vec!["Foo".into()], "x")
            .with_start_number(u32::MAX);
        let err = VariationEngine::seeded(6).generate(&request, None).unwrap_err();
        assert!(matches!(err, VariationError::NumberingOverflow { start: u32::MAX, count: 2 }));
        assert!(!out.exists());

        let request = BatchRequest { count: 1, ..request };
        let paths = VariationEngine::seeded(6).generate(&request, None).unwrap();
        assert!(paths[0].to_string_lossy().ends_with(&format!("_{}.pal", u32::MAX)));
    }

    #[test]
    fn test_hair_batch_with_swatches() {
        let dir = TempDir::new().unwrap();
        let request = BatchRequest::hair(base(), groups(), 2, dir.path(), 40).with_swatches(true);
        let mut calls = 0;
        let mut count = |_: usize, _: usize| calls += 1;
        let paths = VariationEngine::seeded(9).generate(&request, Some(&mut count)).unwrap();
        assert_eq!(paths.len(), 4);
        assert_eq!(calls, 4);
        let swatch = paths[0].with_extension("png");
        assert!(swatch.is_file());
    }
}
