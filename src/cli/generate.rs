//! Project commands (generate, hair, preview)

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::codec::pal;
use crate::config::{load_config, CliOverrides, ConfigError, LoadedConfig};
use crate::models::ProjectState;
use crate::preview::preview_palette;
use crate::swatch::save_swatch;
use crate::variation::{BatchRequest, HueSampling, VariationEngine};

use super::{BatchArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Prints `[current/total]` progress to stderr, rewriting one line on a terminal.
struct ProgressPrinter {
    interactive: bool,
}

impl ProgressPrinter {
    fn new() -> Self {
        Self { interactive: atty::is(atty::Stream::Stderr) }
    }

    fn report(&mut self, current: usize, total: usize) {
        let mut stderr = std::io::stderr().lock();
        let _ = if self.interactive {
            write!(stderr, "\r[{}/{}]", current, total)
        } else {
            writeln!(stderr, "[{}/{}]", current, total)
        };
        if self.interactive && current == total {
            let _ = writeln!(stderr);
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn overrides_from(batch: &BatchArgs) -> CliOverrides {
    CliOverrides {
        output: batch.output.as_deref().map(absolute),
        count: batch.count.map(|c| c as usize),
        start_number: batch.start,
        seed: batch.seed,
        random_saturation: batch.random_saturation.then_some(true),
        random_brightness: batch.random_brightness.then_some(true),
        ..Default::default()
    }
}

/// Load the project and build its state, reporting failures.
fn load_project(
    config: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<(LoadedConfig, ProjectState), ExitCode> {
    let result = load_config(config).and_then(|mut loaded| {
        loaded.apply_overrides(overrides)?;
        let state = loaded.project_state()?;
        Ok((loaded, state))
    });
    result.map_err(|e| {
        eprintln!("Error: {}", e);
        match e {
            ConfigError::NotFound(_) | ConfigError::Validation(_) => {
                ExitCode::from(EXIT_INVALID_ARGS)
            }
            _ => ExitCode::from(EXIT_ERROR),
        }
    })
}

fn run_batch(loaded: &LoadedConfig, request: &BatchRequest) -> ExitCode {
    let mut engine = match loaded.config.generate.seed {
        Some(seed) => VariationEngine::seeded(seed),
        None => VariationEngine::from_entropy(),
    };

    let mut printer = ProgressPrinter::new();
    let mut report = |current: usize, total: usize| printer.report(current, total);
    match engine.generate(request, Some(&mut report)) {
        Ok(paths) => {
            println!("Wrote {} palettes to {}", paths.len(), request.output_dir.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the generate command
pub fn run_generate(batch: &BatchArgs, targets: Vec<String>, even: bool, swatches: bool) -> ExitCode {
    let overrides = CliOverrides {
        targets: (!targets.is_empty()).then_some(targets),
        sampling: even.then_some(HueSampling::Even),
        swatches: swatches.then_some(true),
        ..overrides_from(batch)
    };
    let (loaded, state) = match load_project(batch.config.as_deref(), &overrides) {
        Ok(project) => project,
        Err(code) => return code,
    };
    if state.groups.is_empty() {
        log::warn!("project has no groups; every variant will equal the base palette");
    }
    run_batch(&loaded, &loaded.general_request(&state))
}

/// Execute the hair command
pub fn run_hair(batch: &BatchArgs, styles: Option<u32>) -> ExitCode {
    let overrides = CliOverrides { style_count: styles, ..overrides_from(batch) };
    let (loaded, state) = match load_project(batch.config.as_deref(), &overrides) {
        Ok(project) => project,
        Err(code) => return code,
    };
    run_batch(&loaded, &loaded.hair_request(&state))
}

/// Execute the preview command
pub fn run_preview(config: Option<&Path>, output: &Path, swatch: Option<&Path>) -> ExitCode {
    let (_, state) = match load_project(config, &CliOverrides::default()) {
        Ok(project) => project,
        Err(code) => return code,
    };
    let palette = preview_palette(&state.base, &state.groups);

    if let Err(e) = pal::save(output, palette.colors()) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Wrote preview palette to {}", output.display());

    if let Some(path) = swatch {
        if let Err(e) = save_swatch(&palette, path) {
            eprintln!("Error: failed to write swatch {}: {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Wrote swatch to {}", path.display());
    }
    ExitCode::from(EXIT_SUCCESS)
}
